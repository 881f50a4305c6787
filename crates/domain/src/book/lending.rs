//! Lending state of a book copy.
//!
//! A copy is either on the shelf or held by exactly one borrower. The
//! borrower and the loan timestamp live in the same variant, so one can never
//! be present without the other.

use serde::{Deserialize, Serialize};

use crate::error::{ConflictError, NotFoundError, ShelfError};
use crate::id::{BookId, BorrowerId};
use crate::time::Timestamp;

/// Whether a book copy is on the shelf or out on loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Lending {
    #[default]
    Available,
    Borrowed {
        borrower_id: BorrowerId,
        borrowed_at: Timestamp,
    },
}

/// Stored lending columns disagree: one of borrower / borrowed-at is set
/// without the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("borrower_id and borrowed_at must be both set or both empty")]
pub struct InconsistentLending;

impl Lending {
    /// Rebuild the state from its two nullable columns.
    ///
    /// # Errors
    ///
    /// Returns [`InconsistentLending`] when exactly one part is present.
    pub fn from_parts(
        borrower_id: Option<BorrowerId>,
        borrowed_at: Option<Timestamp>,
    ) -> Result<Self, InconsistentLending> {
        match (borrower_id, borrowed_at) {
            (None, None) => Ok(Self::Available),
            (Some(borrower_id), Some(borrowed_at)) => Ok(Self::Borrowed {
                borrower_id,
                borrowed_at,
            }),
            _ => Err(InconsistentLending),
        }
    }

    #[must_use]
    pub fn is_borrowed(&self) -> bool {
        matches!(self, Self::Borrowed { .. })
    }

    #[must_use]
    pub fn borrower_id(&self) -> Option<BorrowerId> {
        match self {
            Self::Available => None,
            Self::Borrowed { borrower_id, .. } => Some(*borrower_id),
        }
    }

    #[must_use]
    pub fn borrowed_at(&self) -> Option<Timestamp> {
        match self {
            Self::Available => None,
            Self::Borrowed { borrowed_at, .. } => Some(*borrowed_at),
        }
    }

    /// `Available → Borrowed`.
    ///
    /// # Errors
    ///
    /// Returns [`ConflictError::AlreadyBorrowed`] if the copy is already out,
    /// whoever holds it.
    pub fn borrow(
        self,
        book_id: BookId,
        borrower_id: BorrowerId,
        at: Timestamp,
    ) -> Result<Self, ShelfError> {
        match self {
            Self::Available => Ok(Self::Borrowed {
                borrower_id,
                borrowed_at: at,
            }),
            Self::Borrowed { .. } => Err(ConflictError::AlreadyBorrowed {
                book_id: book_id.to_string(),
            }
            .into()),
        }
    }

    /// `Borrowed → Available`.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::NotBorrowed`] if the copy is on the shelf.
    pub fn give_back(self, book_id: BookId) -> Result<Self, ShelfError> {
        match self {
            Self::Borrowed { .. } => Ok(Self::Available),
            Self::Available => Err(NotFoundError::NotBorrowed {
                book_id: book_id.to_string(),
            }
            .into()),
        }
    }
}

impl std::fmt::Display for Lending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => f.write_str("available"),
            Self::Borrowed { .. } => f.write_str("borrowed"),
        }
    }
}
