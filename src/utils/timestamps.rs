//! Clock helpers for persisted records

use chrono::{SecondsFormat, Utc};

/// Current UTC time as ISO-8601 with millisecond precision and a `Z` suffix
/// (e.g. `2024-05-01T12:30:00.123Z`)
pub fn iso_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Milliseconds since the Unix epoch
pub fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}
