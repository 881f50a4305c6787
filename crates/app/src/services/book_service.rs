//! Book service — admission of copies and the borrow / return workflow.

use std::collections::HashMap;

use shelf_domain::book::Book;
use shelf_domain::borrower::Borrower;
use shelf_domain::error::{NotFoundError, ShelfError};
use shelf_domain::id::{BookId, BorrowerId};
use shelf_domain::time::now;

use crate::ports::{BookFilter, BookRepository, BorrowerRepository};

/// A book copy together with its current holder, if any.
///
/// The holder is resolved with an explicit lookup through the borrower
/// repository; it is `None` when the copy is available.
#[derive(Debug, Clone)]
pub struct BookDetails {
    pub book: Book,
    pub borrower: Option<Borrower>,
}

/// Application service for the catalog and lending workflow.
pub struct BookService<BR, UR> {
    books: BR,
    borrowers: UR,
}

impl<BR, UR> BookService<BR, UR>
where
    BR: BookRepository,
    UR: BorrowerRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(books: BR, borrowers: UR) -> Self {
        Self { books, borrowers }
    }

    /// Admit a new copy into the catalog.
    ///
    /// Copies may share an ISBN only when title and author agree with the
    /// copies already stored under it.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Validation`] if invariants fail,
    /// [`ShelfError::Conflict`] if the ISBN is already used with another
    /// title or author, or a storage error propagated from the repository.
    #[tracing::instrument(skip(self, book), fields(isbn = %book.isbn))]
    pub async fn create_book(&self, book: Book) -> Result<BookDetails, ShelfError> {
        book.validate()?;

        let (created, outcome) = self.books.admit(book).await.inspect_err(|err| {
            if matches!(err, ShelfError::Conflict(_)) {
                tracing::debug!("isbn already used with different title or author");
            }
        })?;
        tracing::info!(book_id = %created.id, ?outcome, "book admitted");
        Ok(BookDetails {
            book: created,
            borrower: None,
        })
    }

    /// Look up a copy by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::NotFound`] when no copy with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_book(&self, id: BookId) -> Result<BookDetails, ShelfError> {
        let book = self.books.get_by_id(id).await?.ok_or_else(|| {
            ShelfError::from(NotFoundError::Record {
                entity: "Book",
                id: id.to_string(),
            })
        })?;
        self.describe(book).await
    }

    /// List copies, optionally narrowed by `filter`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_books(&self, filter: &BookFilter) -> Result<Vec<BookDetails>, ShelfError> {
        let books = if filter.is_empty() {
            self.books.get_all().await?
        } else {
            self.books.search(filter).await?
        };

        let mut holders: HashMap<BorrowerId, Option<Borrower>> = HashMap::new();
        let mut result = Vec::with_capacity(books.len());
        for book in books {
            let borrower = match book.lending.borrower_id() {
                None => None,
                Some(borrower_id) => match holders.get(&borrower_id) {
                    Some(cached) => cached.clone(),
                    None => {
                        let found = self.borrowers.get_by_id(borrower_id).await?;
                        holders.insert(borrower_id, found.clone());
                        found
                    }
                },
            };
            result.push(BookDetails { book, borrower });
        }
        Ok(result)
    }

    /// List the copies currently held by a borrower.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::NotFound`] when the borrower does not exist,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn books_held_by(
        &self,
        borrower_id: BorrowerId,
    ) -> Result<Vec<BookDetails>, ShelfError> {
        let borrower = self.require_borrower(borrower_id).await?;
        let books = self.books.find_by_borrower(borrower_id).await?;
        Ok(books
            .into_iter()
            .map(|book| BookDetails {
                book,
                borrower: Some(borrower.clone()),
            })
            .collect())
    }

    /// Lend a copy to a borrower (`Available → Borrowed`).
    ///
    /// Preconditions are checked in order: the copy exists, the copy is
    /// available, the borrower exists.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::NotFound`] when the copy or the borrower is
    /// missing, [`ShelfError::Conflict`] when the copy is already on loan, or
    /// a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn borrow_book(
        &self,
        book_id: BookId,
        borrower_id: BorrowerId,
    ) -> Result<BookDetails, ShelfError> {
        let mut book = self.books.get_by_id(book_id).await?.ok_or_else(|| {
            ShelfError::from(NotFoundError::Record {
                entity: "Book",
                id: book_id.to_string(),
            })
        })?;
        // State is checked before the borrower so a double borrow is always
        // a conflict, whoever asks.
        book.borrow(borrower_id, now()).inspect_err(|_| {
            tracing::debug!("book already borrowed");
        })?;

        let borrower = self.require_borrower(borrower_id).await?;
        let book = self.books.update(book).await?;
        tracing::info!("book borrowed");
        Ok(BookDetails {
            book,
            borrower: Some(borrower),
        })
    }

    /// Take a copy back (`Borrowed → Available`).
    ///
    /// A missing copy and a copy that is not on loan are reported the same
    /// way, as [`NotFoundError::NotBorrowed`]. Callers cannot distinguish
    /// them from the error alone.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::NotFound`] when the copy is missing or not on
    /// loan, or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn return_book(&self, book_id: BookId) -> Result<BookDetails, ShelfError> {
        let not_borrowed = || {
            ShelfError::from(NotFoundError::NotBorrowed {
                book_id: book_id.to_string(),
            })
        };

        let mut book = self
            .books
            .get_by_id(book_id)
            .await?
            .ok_or_else(not_borrowed)?;
        let holder = book.lending.borrower_id();
        book.give_back()?;

        let book = self.books.update(book).await?;
        tracing::info!(borrower_id = ?holder, "book returned");
        Ok(BookDetails {
            book,
            borrower: None,
        })
    }

    async fn require_borrower(&self, id: BorrowerId) -> Result<Borrower, ShelfError> {
        self.borrowers.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError::Record {
                entity: "Borrower",
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn describe(&self, book: Book) -> Result<BookDetails, ShelfError> {
        let borrower = match book.lending.borrower_id() {
            Some(borrower_id) => {
                let found = self.borrowers.get_by_id(borrower_id).await?;
                if found.is_none() {
                    tracing::warn!(
                        book_id = %book.id,
                        %borrower_id,
                        "book held by unknown borrower"
                    );
                }
                found
            }
            None => None,
        };
        Ok(BookDetails { book, borrower })
    }
}
