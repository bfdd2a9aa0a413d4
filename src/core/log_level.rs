//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Event severity, ordered from least to most severe.
///
/// The serialized form is the short code used in every output format
/// (`DBG`, `VRB`, `INFO`, `WRN`, `ERR`, `CRT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    #[serde(rename = "DBG")]
    Debug = 0,
    #[serde(rename = "VRB")]
    Verbose = 1,
    #[default]
    #[serde(rename = "INFO")]
    Info = 2,
    #[serde(rename = "WRN")]
    Warning = 3,
    #[serde(rename = "ERR")]
    Error = 4,
    #[serde(rename = "CRT")]
    Critical = 5,
}

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Debug,
        LogLevel::Verbose,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    /// Short code written into rendered output
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DBG",
            LogLevel::Verbose => "VRB",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WRN",
            LogLevel::Error => "ERR",
            LogLevel::Critical => "CRT",
        }
    }

    /// Parse a level leniently, falling back to [`LogLevel::Info`]
    ///
    /// Accepts names, abbreviations and the numeric ordinals `0`..`5`,
    /// case-insensitively.
    ///
    /// ```
    /// use rust_multisink_logger::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse("wrn"), LogLevel::Warning);
    /// assert_eq!(LogLevel::parse("5"), LogLevel::Critical);
    /// assert_eq!(LogLevel::parse("loud"), LogLevel::Info);
    /// ```
    pub fn parse(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// Whether an event of `candidate` severity passes this threshold
    #[inline]
    pub fn allows(&self, candidate: LogLevel) -> bool {
        candidate >= *self
    }

    /// Whether this level goes to the error stream on a console
    pub fn is_error_stream(&self) -> bool {
        *self >= LogLevel::Warning
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" | "dbg" | "d" | "0" => Ok(LogLevel::Debug),
            "verbose" | "verb" | "vrb" | "v" | "1" => Ok(LogLevel::Verbose),
            "information" | "info" | "inf" | "i" | "2" => Ok(LogLevel::Info),
            "warning" | "warn" | "wrn" | "w" | "3" => Ok(LogLevel::Warning),
            "error" | "err" | "e" | "4" => Ok(LogLevel::Error),
            "critical" | "crit" | "crt" | "c" | "5" => Ok(LogLevel::Critical),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
