//! # shelf-domain
//!
//! Pure domain model for the shelf library catalog.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Validate **ISBN-10 / ISBN-13** identifiers
//! - Define **Books** and their lending state (`Available` / `Borrowed`)
//! - Define **Borrowers** (registered people allowed to hold books)
//! - Decide whether a new book copy may be admitted under an existing ISBN
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod book;
pub mod borrower;
pub mod isbn;
