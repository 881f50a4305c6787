//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod books;
#[allow(clippy::missing_errors_doc)]
pub mod borrowers;

use std::str::FromStr;

use axum::Router;
use axum::routing::{get, put};
use serde::Serialize;

use shelf_app::ports::{BookRepository, BorrowerRepository};
use shelf_app::services::book_service::BookDetails;
use shelf_domain::error::{ShelfError, ValidationError};
use shelf_domain::id::{BookId, BorrowerId};
use shelf_domain::time::Timestamp;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<BR, UR>() -> Router<AppState<BR, UR>>
where
    BR: BookRepository + Send + Sync + 'static,
    UR: BorrowerRepository + Send + Sync + 'static,
{
    Router::new()
        // Books
        .route(
            "/books",
            get(books::list::<BR, UR>).post(books::create::<BR, UR>),
        )
        .route("/books/{id}", get(books::get::<BR, UR>))
        .route("/books/{id}/borrow", put(books::borrow::<BR, UR>))
        .route("/books/{id}/return", put(books::give_back::<BR, UR>))
        // Borrowers
        .route(
            "/borrowers",
            get(borrowers::list::<BR, UR>).post(borrowers::create::<BR, UR>),
        )
        .route("/borrowers/{id}", get(borrowers::get::<BR, UR>))
        .route("/borrowers/{id}/books", get(borrowers::books::<BR, UR>))
}

/// JSON representation of a book copy and its current holder.
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub borrowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrower_id: Option<BorrowerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrower_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrowed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<BookDetails> for BookResponse {
    fn from(BookDetails { book, borrower }: BookDetails) -> Self {
        Self {
            id: book.id,
            borrowed: book.is_borrowed(),
            borrower_id: book.lending.borrower_id(),
            borrower_name: borrower.map(|b| b.name),
            borrowed_at: book.lending.borrowed_at(),
            created_at: book.created_at,
            title: book.title,
            author: book.author,
            isbn: book.isbn,
        }
    }
}

/// Parse an identifier taken from the path or the body.
fn parse_id<T: FromStr>(field: &'static str, raw: &str) -> Result<T, ApiError> {
    T::from_str(raw.trim()).map_err(|_| {
        ApiError::from(ShelfError::from(ValidationError::InvalidId {
            field,
            value: raw.to_string(),
        }))
    })
}

/// Treat an empty query parameter as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
