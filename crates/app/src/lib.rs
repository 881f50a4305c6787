//! # shelf-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `BookRepository` — store, look up and update book copies
//!   - `BorrowerRepository` — store and look up borrowers
//! - Define **driving/inbound ports** as use-case structs:
//!   - `BookService` — admit copies, borrow, return, list, get
//!   - `BorrowerService` — register, list, get
//! - Orchestrate domain objects without knowing *how* persistence works
//!
//! ## Dependency rule
//! Depends on `shelf-domain` only. Never imports adapter crates.
//! Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
