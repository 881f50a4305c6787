//! Borrower — a registered person allowed to hold books.

use serde::{Deserialize, Serialize};

use crate::error::{ShelfError, ValidationError};
use crate::id::BorrowerId;
use crate::time::{Timestamp, now};

/// A registered library member.
///
/// `email` is stored normalised (see [`normalize_email`]), which makes the
/// uniqueness rule case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Borrower {
    pub id: BorrowerId,
    pub name: String,
    pub email: String,
    pub created_at: Timestamp,
}

impl Borrower {
    /// Create a builder for constructing a [`Borrower`].
    #[must_use]
    pub fn builder() -> BorrowerBuilder {
        BorrowerBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Validation`] when `name` or `email` is blank,
    /// or `email` is not a plausible address.
    pub fn validate(&self) -> Result<(), ShelfError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::EmptyEmail.into());
        }
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail(self.email.clone()).into());
        }
        Ok(())
    }
}

/// Canonical form used for storage and lookups: trimmed and lower-cased.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Syntactic address check: `local@domain`, no whitespace, dot-separated
/// non-empty labels on both sides of the `@`.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    let local_ok = local.split('.').all(|part| !part.is_empty());
    let domain_ok = domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    });
    local_ok && domain_ok
}

/// Step-by-step builder for [`Borrower`].
#[derive(Debug, Default)]
pub struct BorrowerBuilder {
    id: Option<BorrowerId>,
    name: Option<String>,
    email: Option<String>,
    created_at: Option<Timestamp>,
}

impl BorrowerBuilder {
    #[must_use]
    pub fn id(mut self, id: BorrowerId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Consume the builder, normalise the email, validate, and return a
    /// [`Borrower`].
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Validation`] if `name` or `email` is missing or
    /// the email is malformed.
    pub fn build(self) -> Result<Borrower, ShelfError> {
        let borrower = Borrower {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            email: normalize_email(&self.email.unwrap_or_default()),
            created_at: self.created_at.unwrap_or_else(now),
        };
        borrower.validate()?;
        Ok(borrower)
    }
}
