//! Timestamp helpers for page metadata.
//!
//! Pages publish dates in many shapes. Values that parse are rewritten as
//! RFC 3339 UTC; anything else is kept verbatim.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use thiserror::Error;

/// Represents a timestamp that can be serialized/deserialized.
pub type Timestamp = DateTime<Utc>;

/// Errors that can occur during timestamp parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    /// The timestamp string is empty.
    #[error("Empty timestamp string")]
    EmptyString,

    /// The timestamp value is invalid.
    #[error("Invalid timestamp: {0}")]
    InvalidFormat(String),
}

/// Returns the current UTC timestamp.
#[must_use]
pub fn now_utc() -> Timestamp {
    Utc::now()
}

/// Parses a timestamp from ISO 8601, RFC 2822 or common written formats.
pub fn parse_timestamp(input: &str) -> Result<Timestamp, TimestampError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(TimestampError::EmptyString);
    }

    if let Some(dt) = parse_iso8601(trimmed) {
        return Ok(dt);
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    parse_human_readable(trimmed).ok_or_else(|| TimestampError::InvalidFormat(trimmed.to_string()))
}

/// Rewrites a parseable timestamp as RFC 3339, otherwise returns it trimmed.
#[must_use]
pub fn normalize_timestamp(input: &str) -> String {
    parse_timestamp(input).map_or_else(
        |_| input.trim().to_string(),
        |dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

fn parse_naive(s: &str, formats: &[&str]) -> Option<Timestamp> {
    for fmt in formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
        if let Some(naive_dt) = NaiveDate::parse_from_str(s, fmt)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Some(Utc.from_utc_datetime(&naive_dt));
        }
    }
    None
}

fn parse_iso8601(s: &str) -> Option<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }

    parse_naive(
        s,
        &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d",
        ],
    )
}

fn parse_human_readable(s: &str) -> Option<Timestamp> {
    parse_naive(
        s,
        &[
            "%B %d, %Y",          // October 5, 2023
            "%b %d, %Y",          // Oct 5, 2023
            "%d %B %Y",           // 5 October 2023
            "%d %b %Y",           // 5 Oct 2023
            "%Y/%m/%d",           // 2023/10/05
            "%d/%m/%Y %H:%M",     // 05/10/2023 14:30
            "%d/%m/%Y",           // 05/10/2023
            "%B %d, %Y %H:%M:%S", // October 5, 2023 14:30:00
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let dt = parse_timestamp("2024-03-01T10:30:00+07:00").unwrap();
        assert_eq!(dt.hour(), 3);
        assert_eq!(dt.day(), 1);
    }

    #[test]
    fn test_parse_compact_offset() {
        let dt = parse_timestamp("2024-03-01T10:30:00+0000").unwrap();
        assert_eq!(dt.hour(), 10);
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_timestamp("2023-10-05").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 10, 5));
    }

    #[test]
    fn test_parse_rfc2822() {
        let dt = parse_timestamp("Thu, 05 Oct 2023 14:30:00 +0000").unwrap();
        assert_eq!(dt.hour(), 14);
    }

    #[test]
    fn test_parse_human_readable() {
        let dt = parse_timestamp("October 5, 2023").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 10, 5));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_timestamp("   "), Err(TimestampError::EmptyString));
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(TimestampError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_normalize_timestamp() {
        assert_eq!(normalize_timestamp("2023-10-05"), "2023-10-05T00:00:00Z");
        assert_eq!(
            normalize_timestamp("2024-03-01T10:30:00+07:00"),
            "2024-03-01T03:30:00Z"
        );
        assert_eq!(normalize_timestamp(" 3 hours ago "), "3 hours ago");
    }
}
