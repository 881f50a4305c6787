//! Borrower service — use-cases for registering and looking up borrowers.

use shelf_domain::borrower::{Borrower, normalize_email};
use shelf_domain::error::{ConflictError, NotFoundError, ShelfError};
use shelf_domain::id::BorrowerId;

use crate::ports::BorrowerRepository;

/// Application service for borrower registration and lookups.
pub struct BorrowerService<R> {
    repo: R,
}

impl<R: BorrowerRepository> BorrowerService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Register a new borrower. The email is normalised first.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Validation`] if invariants fail,
    /// [`ShelfError::Conflict`] if the email is already registered, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, borrower), fields(borrower_id = %borrower.id))]
    pub async fn register_borrower(&self, borrower: Borrower) -> Result<Borrower, ShelfError> {
        let borrower = Borrower {
            email: normalize_email(&borrower.email),
            ..borrower
        };
        borrower.validate()?;
        if self.repo.exists_by_email(&borrower.email).await? {
            tracing::debug!(email = %borrower.email, "email already registered");
            return Err(ConflictError::EmailTaken {
                email: borrower.email,
            }
            .into());
        }
        let created = self.repo.create(borrower).await?;
        tracing::info!("borrower registered");
        Ok(created)
    }

    /// Look up a borrower by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::NotFound`] when no borrower with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_borrower(&self, id: BorrowerId) -> Result<Borrower, ShelfError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError::Record {
                entity: "Borrower",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Look up a borrower by email. The email is normalised first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Borrower>, ShelfError> {
        self.repo.find_by_email(&normalize_email(email)).await
    }

    /// List all borrowers.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_borrowers(&self) -> Result<Vec<Borrower>, ShelfError> {
        self.repo.get_all().await
    }
}
