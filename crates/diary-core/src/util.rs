//! Shared utility functions used across multiple modules.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, NaiveDateTime, Weekday};

/// Display format for entry dates, e.g. `15 Mar 2023`.
pub const DISPLAY_DATE_FORMAT: &str = "%d %b %Y";

static LAST_TIMESTAMP_MS: AtomicI64 = AtomicI64::new(0);

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Current Unix timestamp in milliseconds.
pub fn unix_millis_now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Strictly increasing Unix timestamp in milliseconds.
///
/// Two calls within the same millisecond never return the same value, so the
/// result can order attachments and name copied files without collisions.
pub fn next_timestamp_millis() -> i64 {
    let now = unix_millis_now();
    let previous = LAST_TIMESTAMP_MS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or(now);
    now.max(previous + 1)
}

/// Render a Unix millisecond timestamp as `dd Mon yyyy` in UTC.
///
/// Out-of-range timestamps render as an empty string.
pub fn format_entry_date(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|date_time| date_time.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Reformat a `Wed Mar 15 14:30:00 GMT 2023` style date string as `15 Mar 2023`.
///
/// The weekday must be a valid English weekday name but is not checked against
/// the date. The zone token is required and otherwise ignored: the calendar
/// date is taken as written. Anything unparseable yields an empty string.
///
/// # Examples
///
/// ```
/// use diary_core::util::reformat_date_string;
///
/// assert_eq!(reformat_date_string("Wed Mar 15 14:30:00 GMT 2023"), "15 Mar 2023");
/// assert_eq!(reformat_date_string("2023-03-15"), "");
/// ```
pub fn reformat_date_string(date_string: &str) -> String {
    parse_long_date(date_string)
        .map(|date_time| date_time.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn parse_long_date(date_string: &str) -> Option<NaiveDateTime> {
    let tokens = date_string.split_whitespace().collect::<Vec<_>>();
    let [weekday, month, day, time, zone, year] = tokens.as_slice() else {
        return None;
    };

    weekday.parse::<Weekday>().ok()?;
    if !zone.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }

    // Strict: out-of-range fields such as day 32 are rejected, not rolled over.
    NaiveDateTime::parse_from_str(
        &format!("{day} {month} {year} {time}"),
        "%d %b %Y %H:%M:%S",
    )
    .ok()
}
