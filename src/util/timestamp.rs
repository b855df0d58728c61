//! Display formatting for backend nanosecond timestamps.
//!
//! Backend timestamps count nanoseconds since the Unix epoch. They are
//! truncated to whole milliseconds before formatting, so two instants within
//! the same millisecond always render identically.

#[cfg(test)]
#[path = "timestamp_test.rs"]
mod timestamp_test;

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Rendered in place of a timestamp that cannot be represented as a date.
pub const INVALID_DATE: &str = "Invalid Date";

const NANOS_PER_MILLI: u64 = 1_000_000;

/// `Feb 17, 2026 2:30 PM`
const DISPLAY_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year] [hour repr:12 padding:none]:[minute] [period]");

/// Truncate nanoseconds to whole milliseconds.
#[must_use]
pub fn nanos_to_millis(nanos: u64) -> u64 {
    nanos / NANOS_PER_MILLI
}

/// Format a nanosecond timestamp in UTC.
#[must_use]
pub fn format_timestamp(nanos: u64) -> String {
    format_timestamp_at(nanos, UtcOffset::UTC)
}

/// Format a nanosecond timestamp at a fixed display offset.
///
/// Never fails: instants outside the representable calendar range produce
/// [`INVALID_DATE`].
#[must_use]
pub fn format_timestamp_at(nanos: u64, offset: UtcOffset) -> String {
    let millis = i128::from(nanos_to_millis(nanos));
    let Ok(instant) = OffsetDateTime::from_unix_timestamp_nanos(millis * i128::from(NANOS_PER_MILLI)) else {
        return INVALID_DATE.to_owned();
    };
    let Some(local) = instant.checked_to_offset(offset) else {
        return INVALID_DATE.to_owned();
    };
    match local.format(DISPLAY_FORMAT) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, nanos, "timestamp format failed");
            INVALID_DATE.to_owned()
        }
    }
}
