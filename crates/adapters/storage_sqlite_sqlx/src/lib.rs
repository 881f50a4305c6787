//! # shelf-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `shelf-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Guard lending writes so concurrent borrow/return requests cannot both win
//!
//! ## Dependency rule
//! Depends on `shelf-app` (for port traits) and `shelf-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod book_repo;
mod borrower_repo;
pub mod error;
pub mod pool;

pub use book_repo::SqliteBookRepository;
pub use borrower_repo::SqliteBorrowerRepository;
pub use pool::{Config, Database};
