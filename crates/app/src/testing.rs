//! In-memory port implementations shared by the service tests.

use std::future::Future;
use std::sync::Mutex;

use shelf_domain::book::{Admission, Book, admission};
use shelf_domain::borrower::Borrower;
use shelf_domain::error::{ConflictError, NotFoundError, ShelfError};
use shelf_domain::id::{BookId, BorrowerId};

use crate::ports::{BookFilter, BookRepository, BorrowerRepository};

#[derive(Default)]
pub struct InMemoryBookRepo {
    store: Mutex<Vec<Book>>,
}

impl BookRepository for InMemoryBookRepo {
    fn create(&self, book: Book) -> impl Future<Output = Result<Book, ShelfError>> + Send {
        self.store.lock().unwrap().push(book.clone());
        async { Ok(book) }
    }

    fn admit(
        &self,
        book: Book,
    ) -> impl Future<Output = Result<(Book, Admission), ShelfError>> + Send {
        let mut store = self.store.lock().unwrap();
        let exact = store
            .iter()
            .any(|b| b.isbn == book.isbn && b.title == book.title && b.author == book.author);
        let same_isbn: Vec<Book> = store
            .iter()
            .filter(|b| !exact && b.isbn == book.isbn)
            .cloned()
            .collect();
        let result = admission::check(&book, exact, &same_isbn).map(|outcome| {
            store.push(book.clone());
            (book, outcome)
        });
        async { result }
    }

    fn get_by_id(
        &self,
        id: BookId,
    ) -> impl Future<Output = Result<Option<Book>, ShelfError>> + Send {
        let store = self.store.lock().unwrap();
        let result = store.iter().find(|book| book.id == id).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Book>, ShelfError>> + Send {
        let result = self.store.lock().unwrap().clone();
        async { Ok(result) }
    }

    fn find_by_isbn(
        &self,
        isbn: &str,
    ) -> impl Future<Output = Result<Vec<Book>, ShelfError>> + Send {
        let store = self.store.lock().unwrap();
        let result: Vec<Book> = store.iter().filter(|b| b.isbn == isbn).cloned().collect();
        async { Ok(result) }
    }

    fn exists_exact(
        &self,
        isbn: &str,
        title: &str,
        author: &str,
    ) -> impl Future<Output = Result<bool, ShelfError>> + Send {
        let store = self.store.lock().unwrap();
        let result = store
            .iter()
            .any(|b| b.isbn == isbn && b.title == title && b.author == author);
        async move { Ok(result) }
    }

    fn search(
        &self,
        filter: &BookFilter,
    ) -> impl Future<Output = Result<Vec<Book>, ShelfError>> + Send {
        let store = self.store.lock().unwrap();
        let result: Vec<Book> = store.iter().filter(|b| filter.matches(b)).cloned().collect();
        async { Ok(result) }
    }

    fn find_by_borrower(
        &self,
        borrower_id: BorrowerId,
    ) -> impl Future<Output = Result<Vec<Book>, ShelfError>> + Send {
        let store = self.store.lock().unwrap();
        let result: Vec<Book> = store
            .iter()
            .filter(|b| b.lending.borrower_id() == Some(borrower_id))
            .cloned()
            .collect();
        async { Ok(result) }
    }

    fn update(&self, book: Book) -> impl Future<Output = Result<Book, ShelfError>> + Send {
        let mut store = self.store.lock().unwrap();
        let result = match store.iter_mut().find(|b| b.id == book.id) {
            Some(stored) if stored.is_borrowed() == book.is_borrowed() => {
                if book.is_borrowed() {
                    Err(ConflictError::AlreadyBorrowed {
                        book_id: book.id.to_string(),
                    }
                    .into())
                } else {
                    Err(NotFoundError::NotBorrowed {
                        book_id: book.id.to_string(),
                    }
                    .into())
                }
            }
            Some(stored) => {
                *stored = book.clone();
                Ok(book)
            }
            None => Err(NotFoundError::Record {
                entity: "Book",
                id: book.id.to_string(),
            }
            .into()),
        };
        async { result }
    }
}

#[derive(Default)]
pub struct InMemoryBorrowerRepo {
    store: Mutex<Vec<Borrower>>,
}

impl BorrowerRepository for InMemoryBorrowerRepo {
    fn create(
        &self,
        borrower: Borrower,
    ) -> impl Future<Output = Result<Borrower, ShelfError>> + Send {
        let mut store = self.store.lock().unwrap();
        let result = if store.iter().any(|b| b.email == borrower.email) {
            Err(ConflictError::EmailTaken {
                email: borrower.email,
            }
            .into())
        } else {
            store.push(borrower.clone());
            Ok(borrower)
        };
        async { result }
    }

    fn get_by_id(
        &self,
        id: BorrowerId,
    ) -> impl Future<Output = Result<Option<Borrower>, ShelfError>> + Send {
        let store = self.store.lock().unwrap();
        let result = store.iter().find(|b| b.id == id).cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Borrower>, ShelfError>> + Send {
        let result = self.store.lock().unwrap().clone();
        async { Ok(result) }
    }

    fn exists_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<bool, ShelfError>> + Send {
        let result = self.store.lock().unwrap().iter().any(|b| b.email == email);
        async move { Ok(result) }
    }

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Borrower>, ShelfError>> + Send {
        let store = self.store.lock().unwrap();
        let result = store.iter().find(|b| b.email == email).cloned();
        async { Ok(result) }
    }
}
