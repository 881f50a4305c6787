//! Time and timestamp helpers.
//!
//! Timestamps cross process boundaries (database rows, JSON bodies) as
//! RFC 3339 strings with UTC offset.

use chrono::{DateTime, SecondsFormat, Utc};

/// UTC timestamp used for `created_at` and `borrowed_at`.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Render a timestamp as RFC 3339 with microsecond precision.
#[must_use]
pub fn to_rfc3339(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC 3339 string back into a UTC timestamp.
///
/// # Errors
///
/// Returns [`chrono::ParseError`] when `value` is not valid RFC 3339.
pub fn parse_rfc3339(value: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|ts| ts.with_timezone(&Utc))
}
