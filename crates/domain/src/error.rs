//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`ShelfError`]
//! via `#[from]`. Adapters box their own failures into [`ShelfError::Storage`].

/// Top-level error returned by domain checks and application services.
#[derive(Debug, thiserror::Error)]
pub enum ShelfError {
    /// Malformed input or a broken invariant.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A uniqueness or mutual-exclusion rule was violated.
    #[error("conflict")]
    Conflict(#[from] ConflictError),

    /// The persistence collaborator failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Input that does not satisfy a domain rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("Author is required")]
    EmptyAuthor,

    #[error("ISBN is required")]
    EmptyIsbn,

    #[error("Invalid ISBN format: {0}")]
    InvalidIsbn(String),

    #[error("Name is required")]
    EmptyName,

    #[error("Email is required")]
    EmptyEmail,

    #[error("Email should be valid: {0}")]
    InvalidEmail(String),

    #[error("Borrower ID is required")]
    MissingBorrowerId,

    #[error("Invalid {field} identifier: {value}")]
    InvalidId { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the request field the error relates to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "title",
            Self::EmptyAuthor => "author",
            Self::EmptyIsbn | Self::InvalidIsbn(_) => "isbn",
            Self::EmptyName => "name",
            Self::EmptyEmail | Self::InvalidEmail(_) => "email",
            Self::MissingBorrowerId => "borrower_id",
            Self::InvalidId { field, .. } => *field,
        }
    }
}

/// A lookup that came back empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    /// No record of kind `entity` has the given id.
    #[error("{entity} not found with id: {id}")]
    Record { entity: &'static str, id: String },

    /// A return was requested for a book that is missing or not on loan.
    ///
    /// Both cases are reported the same way; callers cannot tell
    /// an unknown book from an available one through this error.
    #[error("Book is not currently borrowed")]
    NotBorrowed { book_id: String },
}

/// A uniqueness or exclusivity rule was broken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    #[error("A book with ISBN {isbn} already exists but with different title or author")]
    IsbnMismatch { isbn: String },

    #[error("Book is already borrowed")]
    AlreadyBorrowed { book_id: String },

    #[error("Borrower with email {email} already exists")]
    EmailTaken { email: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_validation_error_into_shelf_error() {
        let err: ShelfError = ValidationError::EmptyTitle.into();
        assert!(matches!(
            err,
            ShelfError::Validation(ValidationError::EmptyTitle)
        ));
    }

    #[test]
    fn should_report_field_for_each_validation_error() {
        assert_eq!(ValidationError::EmptyTitle.field(), "title");
        assert_eq!(ValidationError::InvalidIsbn("x".into()).field(), "isbn");
        assert_eq!(ValidationError::InvalidEmail("x".into()).field(), "email");
        assert_eq!(ValidationError::MissingBorrowerId.field(), "borrower_id");
        let err = ValidationError::InvalidId {
            field: "borrower_id",
            value: "nope".into(),
        };
        assert_eq!(err.field(), "borrower_id");
    }

    #[test]
    fn should_format_not_found_with_entity_and_id() {
        let err = NotFoundError::Record {
            entity: "Book",
            id: "42".into(),
        };
        assert_eq!(err.to_string(), "Book not found with id: 42");
    }

    #[test]
    fn should_mention_isbn_in_mismatch_message() {
        let err = ConflictError::IsbnMismatch {
            isbn: "0306406152".into(),
        };
        assert!(err.to_string().contains("0306406152"));
    }
}
