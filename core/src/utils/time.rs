//! Timestamp utilities
//!
//! Thin helpers around chrono for the Unix-timestamp discipline used across
//! the framework. Formatting never panics: an invalid format string or an
//! out-of-range timestamp is reported as an error.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{FrameworkError, FrameworkResult};

/// Current Unix timestamp in seconds
pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Render a Unix timestamp with a strftime format string
pub fn format_timestamp(timestamp: i64, format: &str) -> FrameworkResult<String> {
    let datetime: DateTime<Utc> =
        DateTime::from_timestamp(timestamp, 0).ok_or_else(|| FrameworkError::Internal {
            message: format!("timestamp {timestamp} is out of range"),
        })?;

    // DelayedFormat reports bad specifiers through the write, not a panic
    let mut rendered = String::new();
    write!(rendered, "{}", datetime.format(format)).map_err(|_| FrameworkError::Internal {
        message: format!("invalid time format string '{format}'"),
    })?;
    Ok(rendered)
}

/// Parse a datetime string with a strftime format into a Unix timestamp
pub fn parse_timestamp(text: &str, format: &str) -> FrameworkResult<i64> {
    let parsed = NaiveDateTime::parse_from_str(text, format).map_err(|e| {
        FrameworkError::Internal {
            message: format!("cannot parse '{text}' with format '{format}': {e}"),
        }
    })?;
    Ok(parsed.and_utc().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_epoch() {
        assert_eq!(format_timestamp(0, "%Y-%m-%d").unwrap(), "1970-01-01");
        assert_eq!(
            format_timestamp(0, "%Y-%m-%d %H:%M:%S").unwrap(),
            "1970-01-01 00:00:00"
        );
    }

    #[test]
    fn test_format_invalid_specifier() {
        assert!(format_timestamp(0, "%Q").is_err());
    }

    #[test]
    fn test_format_out_of_range() {
        assert!(format_timestamp(i64::MAX, "%Y").is_err());
    }

    #[test]
    fn test_parse_round_trip() {
        let timestamp = parse_timestamp("2024-05-01 12:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(
            format_timestamp(timestamp, "%Y-%m-%d %H:%M:%S").unwrap(),
            "2024-05-01 12:30:00"
        );
    }

    #[test]
    fn test_parse_failure() {
        assert!(parse_timestamp("not a date", "%Y-%m-%d %H:%M:%S").is_err());
    }

    #[test]
    fn test_now_is_positive() {
        assert!(now_timestamp() > 0);
    }
}
