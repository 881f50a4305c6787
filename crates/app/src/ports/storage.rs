//! Storage port — repository traits for persistence.
//!
//! Each method is one atomic read or write against durable storage.
//! Implementations own the consistency of read-then-write sequences:
//! [`BookRepository::admit`] must decide and insert in one step,
//! [`BookRepository::update`] must refuse to overwrite a lending change that
//! raced with another one, and [`BorrowerRepository::create`] must refuse a
//! duplicate email even if the service-level check passed.

use std::future::Future;

use shelf_domain::book::{Admission, Book};
use shelf_domain::borrower::Borrower;
use shelf_domain::error::ShelfError;
use shelf_domain::id::{BookId, BorrowerId};

/// Optional search criteria for listing books.
///
/// Each set field is a case-insensitive substring match; unset fields match
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
}

impl BookFilter {
    /// Whether no criterion is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none()
    }

    /// Apply the filter to an in-memory book.
    #[must_use]
    pub fn matches(&self, book: &Book) -> bool {
        fn contains(haystack: &str, needle: Option<&String>) -> bool {
            needle.is_none_or(|needle| haystack.to_lowercase().contains(&needle.to_lowercase()))
        }
        contains(&book.title, self.title.as_ref()) && contains(&book.author, self.author.as_ref())
    }
}

/// Repository for persisting and querying [`Book`] copies.
pub trait BookRepository {
    /// Persist a new copy without any admission check.
    fn create(&self, book: Book) -> impl Future<Output = Result<Book, ShelfError>> + Send;

    /// Run the duplicate-ISBN admission check and persist the copy if it
    /// passes.
    ///
    /// The exact-match lookup, the same-ISBN lookup and the insert form one
    /// atomic step: two concurrent admissions under the same ISBN observe
    /// each other, so at most one title and author ever end up stored under
    /// an ISBN. Fails with [`ConflictError::IsbnMismatch`] when the check
    /// rejects the copy.
    ///
    /// [`ConflictError::IsbnMismatch`]: shelf_domain::error::ConflictError::IsbnMismatch
    fn admit(
        &self,
        book: Book,
    ) -> impl Future<Output = Result<(Book, Admission), ShelfError>> + Send;

    /// Get a copy by its unique identifier.
    fn get_by_id(
        &self,
        id: BookId,
    ) -> impl Future<Output = Result<Option<Book>, ShelfError>> + Send;

    /// Get every copy, oldest first.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Book>, ShelfError>> + Send;

    /// Get every copy stored under `isbn` (exact string match).
    fn find_by_isbn(
        &self,
        isbn: &str,
    ) -> impl Future<Output = Result<Vec<Book>, ShelfError>> + Send;

    /// Whether a copy with exactly this `(isbn, title, author)` exists.
    fn exists_exact(
        &self,
        isbn: &str,
        title: &str,
        author: &str,
    ) -> impl Future<Output = Result<bool, ShelfError>> + Send;

    /// Get the copies matching `filter`, oldest first.
    fn search(
        &self,
        filter: &BookFilter,
    ) -> impl Future<Output = Result<Vec<Book>, ShelfError>> + Send;

    /// Get the copies currently held by `borrower_id`.
    fn find_by_borrower(
        &self,
        borrower_id: BorrowerId,
    ) -> impl Future<Output = Result<Vec<Book>, ShelfError>> + Send;

    /// Persist the lending state of an existing copy.
    ///
    /// Writing `Borrowed` must only succeed while the stored copy is still
    /// available (otherwise [`ConflictError::AlreadyBorrowed`]); writing
    /// `Available` must only succeed while it is still borrowed (otherwise
    /// [`NotFoundError::NotBorrowed`]).
    ///
    /// [`ConflictError::AlreadyBorrowed`]: shelf_domain::error::ConflictError::AlreadyBorrowed
    /// [`NotFoundError::NotBorrowed`]: shelf_domain::error::NotFoundError::NotBorrowed
    fn update(&self, book: Book) -> impl Future<Output = Result<Book, ShelfError>> + Send;
}

/// Repository for persisting and querying [`Borrower`]s.
pub trait BorrowerRepository {
    /// Persist a new borrower.
    ///
    /// Must fail with [`ConflictError::EmailTaken`] if the email is already
    /// registered.
    ///
    /// [`ConflictError::EmailTaken`]: shelf_domain::error::ConflictError::EmailTaken
    fn create(
        &self,
        borrower: Borrower,
    ) -> impl Future<Output = Result<Borrower, ShelfError>> + Send;

    /// Get a borrower by its unique identifier.
    fn get_by_id(
        &self,
        id: BorrowerId,
    ) -> impl Future<Output = Result<Option<Borrower>, ShelfError>> + Send;

    /// Get every borrower, oldest first.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Borrower>, ShelfError>> + Send;

    /// Whether a borrower with this (normalised) email exists.
    fn exists_by_email(&self, email: &str)
    -> impl Future<Output = Result<bool, ShelfError>> + Send;

    /// Get the borrower registered under this (normalised) email.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Borrower>, ShelfError>> + Send;
}
