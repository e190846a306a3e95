//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Nanoseconds since the Unix epoch for the given time.
///
/// Saturates at `i64::MAX` for dates past the year 2262.
#[must_use]
pub fn to_unix_nanos(ts: Timestamp) -> i64 {
    ts.timestamp_nanos_opt().unwrap_or(i64::MAX)
}

/// Current time as nanoseconds since the Unix epoch.
#[must_use]
pub fn now_unix_nanos() -> i64 {
    to_unix_nanos(now())
}
