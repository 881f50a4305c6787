//! Admission rule for new copies under an ISBN.
//!
//! Several physical copies may share one ISBN, but they must all carry the
//! same title and author. Title and author are compared exactly
//! (case-sensitive) against the stored values.

use crate::book::Book;
use crate::error::{ConflictError, ShelfError};

/// Outcome of a successful admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// No copy with this ISBN exists yet.
    FirstCopy,
    /// The catalog already holds copies with identical metadata.
    AdditionalCopy,
}

/// Decide whether `candidate` may join the catalog.
///
/// `exact_match_exists` says whether a record with the same
/// `(isbn, title, author)` is already stored; `same_isbn` holds the stored
/// records sharing the candidate's ISBN.
///
/// # Errors
///
/// Returns [`ConflictError::IsbnMismatch`] when a stored copy uses the ISBN
/// with a different title or author.
pub fn check(
    candidate: &Book,
    exact_match_exists: bool,
    same_isbn: &[Book],
) -> Result<Admission, ShelfError> {
    if exact_match_exists {
        return Ok(Admission::AdditionalCopy);
    }

    let mismatch = same_isbn
        .iter()
        .any(|existing| existing.title != candidate.title || existing.author != candidate.author);
    if mismatch {
        return Err(ConflictError::IsbnMismatch {
            isbn: candidate.isbn.clone(),
        }
        .into());
    }

    if same_isbn.is_empty() {
        Ok(Admission::FirstCopy)
    } else {
        Ok(Admission::AdditionalCopy)
    }
}
