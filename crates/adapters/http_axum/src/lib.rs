//! # shelf-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for the catalog and the lending workflow
//!   (`/api/books`, `/api/borrowers`, …)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and [`ShelfError`](shelf_domain::error::ShelfError)s
//!   into HTTP responses with a uniform error body
//!
//! ## Dependency rule
//! Depends on `shelf-app` (for port traits and services) and `shelf-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
