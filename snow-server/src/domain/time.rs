//! Timestamp handling for the observation feed.
//!
//! The feed sends and accepts ISO-8601 timestamps in UTC, e.g.
//! `2024-01-15T06:00:00Z`. Query parameters are written with millisecond
//! precision to match what browsers send.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, Utc};

/// Default display format for daily record dates (day.month.year).
pub const DEFAULT_DATE_FORMAT: &str = "%-d.%-m.%Y";

/// Error returned when parsing an invalid feed timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp {input:?}: {reason}")]
pub struct TimeError {
    input: String,
    reason: String,
}

/// Error returned for a display format chrono cannot render.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date format {format:?}")]
pub struct DateFormatError {
    format: String,
}

impl DateFormatError {
    fn new(format: &str) -> Self {
        Self {
            format: format.to_string(),
        }
    }
}

/// Parse a timestamp as sent by the feed.
///
/// Accepts any RFC 3339 timestamp; the result is normalized to UTC.
///
/// # Examples
///
/// ```
/// use snow_server::domain::parse_feed_time;
///
/// let t = parse_feed_time("2024-01-15T06:00:00Z").unwrap();
/// assert_eq!(t.to_rfc3339(), "2024-01-15T06:00:00+00:00");
///
/// assert!(parse_feed_time("yesterday").is_err());
/// ```
pub fn parse_feed_time(s: &str) -> Result<DateTime<Utc>, TimeError> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| TimeError {
            input: s.to_string(),
            reason: e.to_string(),
        })
}

/// Format an instant for use as a `starttime`/`endtime` query parameter.
pub fn format_query_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Check that every specifier in a display format is one chrono knows.
///
/// # Examples
///
/// ```
/// use snow_server::domain::validate_date_format;
///
/// assert!(validate_date_format("%-d.%-m.%Y").is_ok());
/// assert!(validate_date_format("%Q").is_err());
/// ```
pub fn validate_date_format(format: &str) -> Result<(), DateFormatError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(DateFormatError::new(format));
    }
    Ok(())
}

/// Format the calendar date of an instant for display.
pub fn format_display_date(t: DateTime<Utc>, format: &str) -> Result<String, DateFormatError> {
    let mut out = String::new();
    write!(out, "{}", t.format(format)).map_err(|_| DateFormatError::new(format))?;
    Ok(out)
}
