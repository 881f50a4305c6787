//! `SQLite` implementation of [`BorrowerRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use shelf_app::ports::BorrowerRepository;
use shelf_domain::borrower::Borrower;
use shelf_domain::error::{ConflictError, ShelfError};
use shelf_domain::id::BorrowerId;
use shelf_domain::time::{parse_rfc3339, to_rfc3339};

use crate::error::{StorageError, decode, is_unique_violation};

/// Wrapper for converting database rows into domain [`Borrower`].
struct Wrapper(Borrower);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Borrower> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let email: String = row.try_get("email")?;
        let created_at: String = row.try_get("created_at")?;

        let id = BorrowerId::from_str(&id).map_err(decode)?;
        let created_at = parse_rfc3339(&created_at).map_err(decode)?;

        Ok(Self(Borrower {
            id,
            name,
            email,
            created_at,
        }))
    }
}

const INSERT: &str = "INSERT INTO borrowers (id, name, email, created_at) VALUES (?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM borrowers WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM borrowers ORDER BY created_at, rowid";
const SELECT_BY_EMAIL: &str = "SELECT * FROM borrowers WHERE email = ?";
const EXISTS_BY_EMAIL: &str = "SELECT EXISTS (SELECT 1 FROM borrowers WHERE email = ?)";

/// `SQLite`-backed borrower repository.
#[derive(Clone)]
pub struct SqliteBorrowerRepository {
    pool: SqlitePool,
}

impl SqliteBorrowerRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl BorrowerRepository for SqliteBorrowerRepository {
    fn create(
        &self,
        borrower: Borrower,
    ) -> impl Future<Output = Result<Borrower, ShelfError>> + Send {
        let pool = self.pool.clone();
        async move {
            let result = sqlx::query(INSERT)
                .bind(borrower.id.to_string())
                .bind(&borrower.name)
                .bind(&borrower.email)
                .bind(to_rfc3339(borrower.created_at))
                .execute(&pool)
                .await;

            match result {
                Ok(_) => Ok(borrower),
                Err(err) if is_unique_violation(&err) => Err(ConflictError::EmailTaken {
                    email: borrower.email,
                }
                .into()),
                Err(err) => Err(StorageError::from(err).into()),
            }
        }
    }

    fn get_by_id(
        &self,
        id: BorrowerId,
    ) -> impl Future<Output = Result<Option<Borrower>, ShelfError>> + Send {
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

    fn get_all(&self) -> impl Future<Output = Result<Vec<Borrower>, ShelfError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn exists_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<bool, ShelfError>> + Send {
        let pool = self.pool.clone();
        let email = email.to_string();
        async move {
            let exists: bool = sqlx::query_scalar(EXISTS_BY_EMAIL)
                .bind(email)
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(exists)
        }
    }

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Borrower>, ShelfError>> + Send {
        let pool = self.pool.clone();
        let email = email.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_EMAIL)
                .bind(email)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteBorrowerRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteBorrowerRepository::new(db.pool().clone())
    }

    fn borrower(name: &str, email: &str) -> Borrower {
        Borrower::builder().name(name).email(email).build().unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_borrower_when_valid() {
        let repo = setup().await;
        let created = repo
            .create(borrower("John Doe", "john@example.com"))
            .await
            .unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.name, "John Doe");
        assert_eq!(fetched.email, "john@example.com");
    }

    #[tokio::test]
    async fn should_return_none_when_borrower_not_found() {
        let repo = setup().await;
        let result = repo.get_by_id(BorrowerId::new()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_reject_duplicate_email_with_conflict() {
        let repo = setup().await;
        repo.create(borrower("John", "john@example.com"))
            .await
            .unwrap();

        let result = repo.create(borrower("Johnny", "john@example.com")).await;
        assert!(matches!(
            result,
            Err(ShelfError::Conflict(ConflictError::EmailTaken { .. }))
        ));
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_look_up_borrower_by_email() {
        let repo = setup().await;
        let created = repo
            .create(borrower("Jane", "jane@example.com"))
            .await
            .unwrap();

        assert!(repo.exists_by_email("jane@example.com").await.unwrap());
        assert!(!repo.exists_by_email("john@example.com").await.unwrap());

        let found = repo.find_by_email("jane@example.com").await.unwrap();
        assert_eq!(found.map(|b| b.id), Some(created.id));
    }

    #[tokio::test]
    async fn should_list_borrowers_oldest_first() {
        let repo = setup().await;
        repo.create(borrower("A", "a@example.com")).await.unwrap();
        repo.create(borrower("B", "b@example.com")).await.unwrap();

        let names: Vec<String> = repo
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, ["A", "B"]);
    }
}
