//! Timestamp parsing for anchors and record columns.
//!
//! Everything is read as wall-clock time. An explicit UTC offset is accepted
//! but only the local reading is kept; no conversion between zones happens.
//!
//! # Supported Formats
//!
//! - **SQL style**: `"2023-03-31 13:15:15"`, with optional fraction
//! - **ISO8601 local**: `"2023-03-31T13:15:15"`
//! - **RFC3339**: `"2023-03-31T13:15:15+02:00"` (kept as 13:15:15)
//! - **Date only**: `"2023-03-31"` (midnight)
//! - **Unix seconds**: `"1680268515"` (must be > 8 digits)
//!
//! Unix seconds name an absolute instant, so they are read in a timezone:
//! the configured one via [`parse_in`], UTC via [`parse`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

/// Format used when printing range boundaries.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a timestamp string into a wall-clock instant.
pub fn parse(input: &str) -> Option<NaiveDateTime> {
    parse_in(input, Tz::UTC)
}

/// Like [`parse`], with Unix seconds read as wall-clock time in `tz`.
pub fn parse_in(input: &str, tz: Tz) -> Option<NaiveDateTime> {
    let input = input.trim();

    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_local());
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    // Must be long enough not to be confused with a year
    if input.len() > 8 {
        if let Ok(secs) = input.parse::<i64>() {
            return from_unix_seconds(secs, tz);
        }
    }

    None
}

/// Wall-clock reading of a Unix instant in `tz`.
pub fn from_unix_seconds(secs: i64, tz: Tz) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.with_timezone(&tz).naive_local())
}
