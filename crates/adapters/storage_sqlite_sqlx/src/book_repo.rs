//! `SQLite` implementation of [`BookRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Row, Sqlite, SqlitePool};

use shelf_app::ports::{BookFilter, BookRepository};
use shelf_domain::book::{Admission, Book, Lending, admission};
use shelf_domain::error::{ConflictError, NotFoundError, ShelfError};
use shelf_domain::id::{BookId, BorrowerId};
use shelf_domain::time::{parse_rfc3339, to_rfc3339};

use crate::error::{StorageError, decode};

/// Wrapper for converting database rows into domain [`Book`].
struct Wrapper(Book);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Book> {
        value.map(|w| w.0)
    }

    fn many(values: Vec<Self>) -> Vec<Book> {
        values.into_iter().map(|w| w.0).collect()
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let title: String = row.try_get("title")?;
        let author: String = row.try_get("author")?;
        let isbn: String = row.try_get("isbn")?;
        let borrower_id: Option<String> = row.try_get("borrower_id")?;
        let borrowed_at: Option<String> = row.try_get("borrowed_at")?;
        let created_at: String = row.try_get("created_at")?;

        let id = BookId::from_str(&id).map_err(decode)?;
        let borrower_id = borrower_id
            .map(|s| BorrowerId::from_str(&s))
            .transpose()
            .map_err(decode)?;
        let borrowed_at = borrowed_at
            .map(|s| parse_rfc3339(&s))
            .transpose()
            .map_err(decode)?;
        let lending = Lending::from_parts(borrower_id, borrowed_at).map_err(decode)?;
        let created_at = parse_rfc3339(&created_at).map_err(decode)?;

        Ok(Self(Book {
            id,
            title,
            author,
            isbn,
            lending,
            created_at,
        }))
    }
}

const INSERT: &str = "INSERT INTO books (id, title, author, isbn, borrower_id, borrowed_at, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM books WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM books ORDER BY created_at, rowid";
const SELECT_BY_ISBN: &str = "SELECT * FROM books WHERE isbn = ? ORDER BY created_at, rowid";
const SELECT_BY_BORROWER: &str =
    "SELECT * FROM books WHERE borrower_id = ? ORDER BY borrowed_at, rowid";
const EXISTS_EXACT: &str =
    "SELECT EXISTS (SELECT 1 FROM books WHERE isbn = ? AND title = ? AND author = ?)";
const EXISTS_EXACT_OTHER: &str = "SELECT EXISTS (SELECT 1 FROM books WHERE isbn = ? AND title = ? AND author = ? AND id <> ?)";
const SELECT_BY_ISBN_OTHER: &str =
    "SELECT * FROM books WHERE isbn = ? AND id <> ? ORDER BY created_at, rowid";
const EXISTS_BY_ID: &str = "SELECT EXISTS (SELECT 1 FROM books WHERE id = ?)";
// `instr` instead of `LIKE` so `%` and `_` in the query are taken literally.
const SEARCH: &str = "SELECT * FROM books \
    WHERE (? IS NULL OR instr(lower(title), lower(?)) > 0) \
    AND (? IS NULL OR instr(lower(author), lower(?)) > 0) \
    ORDER BY created_at, rowid";
const MARK_BORROWED: &str = "UPDATE books SET borrower_id = ?, borrowed_at = ? WHERE id = ? AND borrower_id IS NULL";
const MARK_AVAILABLE: &str = "UPDATE books SET borrower_id = NULL, borrowed_at = NULL WHERE id = ? AND borrower_id IS NOT NULL";

/// `SQLite`-backed book repository.
#[derive(Clone)]
pub struct SqliteBookRepository {
    pool: SqlitePool,
}

impl SqliteBookRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn insert(book: &Book) -> sqlx::query::Query<'_, Sqlite, SqliteArguments<'_>> {
    sqlx::query(INSERT)
        .bind(book.id.to_string())
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.lending.borrower_id().map(|id| id.to_string()))
        .bind(book.lending.borrowed_at().map(to_rfc3339))
        .bind(to_rfc3339(book.created_at))
}

impl BookRepository for SqliteBookRepository {
    fn create(&self, book: Book) -> impl Future<Output = Result<Book, ShelfError>> + Send {
        let pool = self.pool.clone();
        async move {
            insert(&book)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(book)
        }
    }

    fn admit(
        &self,
        book: Book,
    ) -> impl Future<Output = Result<(Book, Admission), ShelfError>> + Send {
        let pool = self.pool.clone();
        async move {
            let mut tx = pool.begin().await.map_err(StorageError::from)?;

            // The insert comes first so the transaction holds the write lock
            // before it reads: a concurrent admission under the same ISBN
            // waits here and then sees this copy. The lookups skip the row
            // just written. Dropping `tx` on any early return rolls it back.
            insert(&book)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            let book_id = book.id.to_string();
            let exact: bool = sqlx::query_scalar(EXISTS_EXACT_OTHER)
                .bind(&book.isbn)
                .bind(&book.title)
                .bind(&book.author)
                .bind(&book_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            let same_isbn: Vec<Wrapper> = if exact {
                Vec::new()
            } else {
                sqlx::query_as(SELECT_BY_ISBN_OTHER)
                    .bind(&book.isbn)
                    .bind(&book_id)
                    .fetch_all(&mut *tx)
                    .await
                    .map_err(StorageError::from)?
            };

            let outcome = admission::check(&book, exact, &Wrapper::many(same_isbn))?;
            tx.commit().await.map_err(StorageError::from)?;

            Ok((book, outcome))
        }
    }

    fn get_by_id(
        &self,
        id: BookId,
    ) -> impl Future<Output = Result<Option<Book>, ShelfError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Book>, ShelfError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::many(rows))
        }
    }

    fn find_by_isbn(
        &self,
        isbn: &str,
    ) -> impl Future<Output = Result<Vec<Book>, ShelfError>> + Send {
        let pool = self.pool.clone();
        let isbn = isbn.to_string();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_ISBN)
                .bind(isbn)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::many(rows))
        }
    }

    fn exists_exact(
        &self,
        isbn: &str,
        title: &str,
        author: &str,
    ) -> impl Future<Output = Result<bool, ShelfError>> + Send {
        let pool = self.pool.clone();
        let (isbn, title, author) = (isbn.to_string(), title.to_string(), author.to_string());
        async move {
            let exists: bool = sqlx::query_scalar(EXISTS_EXACT)
                .bind(isbn)
                .bind(title)
                .bind(author)
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(exists)
        }
    }

    fn search(
        &self,
        filter: &BookFilter,
    ) -> impl Future<Output = Result<Vec<Book>, ShelfError>> + Send {
        let pool = self.pool.clone();
        let filter = filter.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SEARCH)
                .bind(filter.title.as_deref())
                .bind(filter.title.as_deref())
                .bind(filter.author.as_deref())
                .bind(filter.author.as_deref())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::many(rows))
        }
    }

    fn find_by_borrower(
        &self,
        borrower_id: BorrowerId,
    ) -> impl Future<Output = Result<Vec<Book>, ShelfError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_BORROWER)
                .bind(borrower_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::many(rows))
        }
    }

    fn update(&self, book: Book) -> impl Future<Output = Result<Book, ShelfError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = match book.lending {
                Lending::Borrowed {
                    borrower_id,
                    borrowed_at,
                } => sqlx::query(MARK_BORROWED)
                    .bind(borrower_id.to_string())
                    .bind(to_rfc3339(borrowed_at))
                    .bind(book.id.to_string()),
                Lending::Available => sqlx::query(MARK_AVAILABLE).bind(book.id.to_string()),
            }
            .execute(&pool)
            .await
            .map_err(StorageError::from)?;

            if result.rows_affected() == 1 {
                return Ok(book);
            }

            // The guard rejected the write: either the row is gone or another
            // request changed its lending state first.
            let book_id = book.id.to_string();
            if book.is_borrowed() {
                let exists: bool = sqlx::query_scalar(EXISTS_BY_ID)
                    .bind(&book_id)
                    .fetch_one(&pool)
                    .await
                    .map_err(StorageError::from)?;
                if !exists {
                    return Err(NotFoundError::Record {
                        entity: "Book",
                        id: book_id,
                    }
                    .into());
                }
                tracing::debug!(book_id = %book_id, "lost borrow race");
                Err(ConflictError::AlreadyBorrowed { book_id }.into())
            } else {
                tracing::debug!(book_id = %book_id, "lost return race");
                Err(NotFoundError::NotBorrowed { book_id }.into())
            }
        }
    }
}
