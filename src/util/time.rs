//! Timestamp helpers for healthflux.
//!
//! Apple Health writes dates as `YYYY-MM-DD HH:MM:SS ±HHMM`, activity
//! summaries as a bare `YYYY-MM-DD`. Watermarks are stored in the same
//! textual form so they compare against raw start-dates as strings.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Format used by the export for `startDate`/`endDate` attributes.
const EXPORT_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Parse a start-date string from the export into a UTC `DateTime`.
///
/// Accepts:
/// - `YYYY-MM-DD HH:MM:SS ±HHMM` (records and workouts)
/// - RFC 3339
/// - `YYYY-MM-DD HH:MM:SS` (interpreted as UTC)
/// - `YYYY-MM-DD` (midnight UTC; activity summaries)
pub fn parse_export_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_str(input, EXPORT_FORMAT) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }

    // Date only (midnight)
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}

/// Format a UTC timestamp the way the export writes start-dates, e.g.
/// `2024-01-15 10:23:45 +0000`.
pub fn format_export_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(EXPORT_FORMAT).to_string()
}

/// Format a `std::time::Duration` into a human-readable string.
///
/// Used in the final import summary. Examples: `4.0ms`, `1.2s`, `1.5m`.
pub fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.01 {
        format!("{:.1}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.1}s")
    } else {
        let mins = secs / 60.0;
        format!("{mins:.1}m")
    }
}
