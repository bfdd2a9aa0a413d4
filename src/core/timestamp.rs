//! Timestamp formatting utilities
//!
//! Events carry whole Unix seconds; each sink chooses how those seconds are
//! written out. Formats are rendered in the local time zone.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::str::FromStr;

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use rust_multisink_logger::TimestampFormat;
///
/// assert_eq!(TimestampFormat::UnixTimestamp.format(1736332245), "1736332245");
/// assert_eq!(TimestampFormat::None.format(1736332245), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// No timestamp at all
    None,

    /// Wall clock time: `10:30:45`
    #[default]
    TimeOnly,

    /// Wall clock time with sub-second digits: `10:30:45.000000`
    TimeOnlyMillis,

    /// Calendar date: `2025-01-08`
    DateOnly,

    /// Date and time: `2025-01-08 10:30:45`
    DateTime,

    /// Date and time with sub-second digits: `2025-01-08 10:30:45.000000`
    DateTimeMillis,

    /// Unix timestamp in seconds: `1736332245`
    UnixTimestamp,

    /// Custom strftime format; a pattern with an invalid directive renders
    /// Unix seconds instead
    ///
    /// ```
    /// use rust_multisink_logger::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// assert!(!format.is_numeric());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format Unix seconds in the local time zone
    #[must_use]
    pub fn format(&self, timestamp: i64) -> String {
        self.format_in(timestamp, &Local)
    }

    /// Format Unix seconds in an explicit time zone
    #[must_use]
    pub fn format_in<Tz>(&self, timestamp: i64, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let pattern = match self {
            TimestampFormat::None => return String::new(),
            TimestampFormat::UnixTimestamp => return timestamp.to_string(),
            TimestampFormat::TimeOnly => "%H:%M:%S",
            TimestampFormat::TimeOnlyMillis => "%H:%M:%S%.6f",
            TimestampFormat::DateOnly => "%Y-%m-%d",
            TimestampFormat::DateTime => "%Y-%m-%d %H:%M:%S",
            TimestampFormat::DateTimeMillis => "%Y-%m-%d %H:%M:%S%.6f",
            TimestampFormat::Custom(format_str) => format_str.as_str(),
        };

        let utc: DateTime<Utc> = DateTime::from_timestamp(timestamp, 0).unwrap_or_default();
        let mut output = String::new();
        // Unknown or parse-only directives fail at render time
        match write!(output, "{}", utc.with_timezone(tz).format(pattern)) {
            Ok(()) => output,
            Err(_) => timestamp.to_string(),
        }
    }

    /// Parse a format name or ordinal, falling back to [`TimestampFormat::TimeOnly`]
    pub fn parse(input: &str) -> Self {
        input.parse().unwrap_or_default()
    }

    /// Check if this is the Unix numeric format (or no format at all, which
    /// falls back to Unix seconds wherever a timestamp is mandatory)
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::None | TimestampFormat::UnixTimestamp)
    }
}

impl FromStr for TimestampFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "0" => Ok(TimestampFormat::None),
            "time_only" | "1" => Ok(TimestampFormat::TimeOnly),
            "time_only_millis" | "2" => Ok(TimestampFormat::TimeOnlyMillis),
            "date_only" | "3" => Ok(TimestampFormat::DateOnly),
            "date_time" | "4" => Ok(TimestampFormat::DateTime),
            "date_time_millis" | "5" => Ok(TimestampFormat::DateTimeMillis),
            "unix_timestamp" | "6" => Ok(TimestampFormat::UnixTimestamp),
            _ => Err(format!("Invalid timestamp format: '{}'", s)),
        }
    }
}
