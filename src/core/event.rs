//! Event record

use super::call_frame::CallFrame;
use super::error::{LoggerError, Result};
use super::exception::ExceptionDetails;
use super::log_level::LogLevel;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One log event, immutable once built.
///
/// Canonical form:
/// `{application_name, timestamp, level, message, traces: [...], exception: {...} | null}`.
/// `traces` is also accepted under the `stack_trace` key used by the JSON-lines output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    application_name: String,
    timestamp: i64,
    level: LogLevel,
    message: String,
    #[serde(default, alias = "stack_trace")]
    traces: Vec<CallFrame>,
    #[serde(default)]
    exception: Option<ExceptionDetails>,
}

impl Event {
    /// Create an event stamped with the current time
    pub fn new(
        application_name: impl Into<String>,
        level: LogLevel,
        message: impl Into<String>,
    ) -> Self {
        Self {
            application_name: application_name.into(),
            timestamp: Utc::now().timestamp(),
            level,
            message: message.into(),
            traces: Vec::new(),
            exception: None,
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_traces(mut self, traces: Vec<CallFrame>) -> Self {
        self.traces = traces;
        self
    }

    #[must_use]
    pub fn with_exception(mut self, exception: Option<ExceptionDetails>) -> Self {
        self.exception = exception;
        self
    }

    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn traces(&self) -> &[CallFrame] {
        &self.traces
    }

    /// The innermost captured frame
    pub fn first_trace(&self) -> Option<&CallFrame> {
        self.traces.first()
    }

    pub fn exception(&self) -> Option<&ExceptionDetails> {
        self.exception.as_ref()
    }

    /// Canonical object form
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Rebuild from the canonical object form
    ///
    /// `application_name`, `timestamp`, `level` and `message` are required;
    /// a missing or mistyped field yields [`LoggerError::MalformedRecord`].
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| LoggerError::malformed("event", e.to_string()))
    }

    /// Canonical form as a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LoggerError::malformed("event", e.to_string()))
    }
}
