//! Timestamps for source/server stamping and history ranges.

use chrono::{DateTime, SecondsFormat, Utc};

/// UTC timestamp carried by data values and history records.
pub type Timestamp = DateTime<Utc>;

/// Current UTC time, used as server timestamp on every committed write.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse an RFC 3339 string, normalizing any offset to UTC.
///
/// # Errors
///
/// Returns the `chrono` parse error when `value` is not RFC 3339.
pub fn parse_rfc3339(value: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.to_utc())
}

/// Fixed-width RFC 3339 rendering (nanoseconds, `Z` suffix) whose
/// lexicographic order equals chronological order.
#[must_use]
pub fn to_sortable_string(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}
