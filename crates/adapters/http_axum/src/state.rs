//! Shared application state for axum handlers.

use std::sync::Arc;

use shelf_app::ports::{BookRepository, BorrowerRepository};
use shelf_app::services::book_service::BookService;
use shelf_app::services::borrower_service::BorrowerService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository types to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<BR, UR> {
    /// Catalog and lending service.
    pub book_service: Arc<BookService<BR, UR>>,
    /// Borrower registration service.
    pub borrower_service: Arc<BorrowerService<UR>>,
}

impl<BR, UR> Clone for AppState<BR, UR> {
    fn clone(&self) -> Self {
        Self {
            book_service: Arc::clone(&self.book_service),
            borrower_service: Arc::clone(&self.borrower_service),
        }
    }
}

impl<BR, UR> AppState<BR, UR>
where
    BR: BookRepository + Send + Sync + 'static,
    UR: BorrowerRepository + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(book_service: BookService<BR, UR>, borrower_service: BorrowerService<UR>) -> Self {
        Self {
            book_service: Arc::new(book_service),
            borrower_service: Arc::new(borrower_service),
        }
    }
}
