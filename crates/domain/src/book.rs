//! Book — one physical copy in the catalog.
//!
//! Copies are identified by [`BookId`]; several copies may share an ISBN
//! (see [`admission`]). The only mutable part of a book is its [`Lending`]
//! state.

pub mod admission;
pub mod lending;

use serde::{Deserialize, Serialize};

pub use self::admission::Admission;
pub use self::lending::{InconsistentLending, Lending};

use crate::error::{ShelfError, ValidationError};
use crate::id::{BookId, BorrowerId};
use crate::isbn;
use crate::time::{Timestamp, now};

/// A catalogued book copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub lending: Lending,
    pub created_at: Timestamp,
}

impl Book {
    /// Create a builder for constructing a [`Book`].
    #[must_use]
    pub fn builder() -> BookBuilder {
        BookBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// Presence is checked before the ISBN checksum, because
    /// [`isbn::is_valid`] accepts blank input.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Validation`] when `title`, `author` or `isbn` is
    /// blank, or when `isbn` fails its checksum.
    pub fn validate(&self) -> Result<(), ShelfError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        if self.author.trim().is_empty() {
            return Err(ValidationError::EmptyAuthor.into());
        }
        if self.isbn.trim().is_empty() {
            return Err(ValidationError::EmptyIsbn.into());
        }
        if !isbn::is_valid(Some(&self.isbn)) {
            return Err(ValidationError::InvalidIsbn(self.isbn.clone()).into());
        }
        Ok(())
    }

    #[must_use]
    pub fn is_borrowed(&self) -> bool {
        self.lending.is_borrowed()
    }

    /// Hand this copy to `borrower_id`, stamping the loan with `at`.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Conflict`] if the copy is already on loan.
    pub fn borrow(&mut self, borrower_id: BorrowerId, at: Timestamp) -> Result<(), ShelfError> {
        self.lending = self.lending.borrow(self.id, borrower_id, at)?;
        Ok(())
    }

    /// Put this copy back on the shelf.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::NotFound`] if the copy is not on loan.
    pub fn give_back(&mut self) -> Result<(), ShelfError> {
        self.lending = self.lending.give_back(self.id)?;
        Ok(())
    }
}

/// Step-by-step builder for [`Book`].
#[derive(Debug, Default)]
pub struct BookBuilder {
    id: Option<BookId>,
    title: Option<String>,
    author: Option<String>,
    isbn: Option<String>,
    lending: Lending,
    created_at: Option<Timestamp>,
}

impl BookBuilder {
    #[must_use]
    pub fn id(mut self, id: BookId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    #[must_use]
    pub fn isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    #[must_use]
    pub fn lending(mut self, lending: Lending) -> Self {
        self.lending = lending;
        self
    }

    #[must_use]
    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Consume the builder, validate, and return a [`Book`].
    ///
    /// A missing id or creation time is generated.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Validation`] if a required field is missing or
    /// the ISBN is invalid.
    pub fn build(self) -> Result<Book, ShelfError> {
        let book = Book {
            id: self.id.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            isbn: self.isbn.unwrap_or_default(),
            lending: self.lending,
            created_at: self.created_at.unwrap_or_else(now),
        };
        book.validate()?;
        Ok(book)
    }
}
