//! Exception details and cause chains

use super::call_frame::CallFrame;
use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};

/// Upper bound on how many `source()` links are followed when converting a
/// native error. Error chains are acyclic in practice; the cap keeps a broken
/// `source()` implementation from looping forever.
pub const MAX_CAUSE_DEPTH: usize = 64;

/// A captured exception, optionally linked to the exception that caused it.
///
/// The canonical form is
/// `{name, message, code, file, line, trace: [...], previous: {...} | null}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionDetails {
    pub name: String,
    pub message: String,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_trace")]
    pub trace: Vec<CallFrame>,
    #[serde(default)]
    pub previous: Option<Box<ExceptionDetails>>,
}

impl ExceptionDetails {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            code: None,
            file: None,
            line: None,
            trace: Vec::new(),
            previous: None,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    #[must_use]
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn with_trace(mut self, trace: Vec<CallFrame>) -> Self {
        self.trace = trace;
        self
    }

    #[must_use]
    pub fn with_previous(mut self, previous: ExceptionDetails) -> Self {
        self.previous = Some(Box::new(previous));
        self
    }

    /// Iterate over this exception followed by each of its causes
    pub fn chain(&self) -> impl Iterator<Item = &ExceptionDetails> {
        std::iter::successors(Some(self), |e| e.previous.as_deref())
    }

    /// Convert a native error, walking its `source()` chain into `previous`
    ///
    /// ```
    /// use rust_multisink_logger::ExceptionDetails;
    ///
    /// let err = "x".parse::<u32>().unwrap_err();
    /// let details = ExceptionDetails::from_error(&err);
    /// assert_eq!(details.name, "ParseIntError");
    /// assert_eq!(details.message, err.to_string());
    /// ```
    pub fn from_error<E>(error: &E) -> Self
    where
        E: std::error::Error + 'static,
    {
        let name = short_type_name(std::any::type_name::<E>())
            .map(str::to_string)
            .unwrap_or_else(|| debug_name(error));
        Self::build(name, error, 0)
    }

    /// Convert a type-erased error; the name is taken from its `Debug` output
    pub fn from_dyn_error(error: &(dyn std::error::Error + 'static)) -> Self {
        Self::build(debug_name(error), error, 0)
    }

    fn build(name: String, error: &(dyn std::error::Error + 'static), depth: usize) -> Self {
        let mut details = Self::new(name, error.to_string());
        if let Some(io) = error.downcast_ref::<std::io::Error>() {
            details.code = io.raw_os_error().map(i64::from);
        }
        if depth < MAX_CAUSE_DEPTH {
            details.previous = error
                .source()
                .map(|source| Box::new(Self::build(debug_name(source), source, depth + 1)));
        }
        details
    }

    /// Canonical object form
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Rebuild from the canonical object form
    ///
    /// Fails with [`LoggerError::MalformedRecord`] when `name` or `message` is
    /// missing or a field has the wrong shape.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| LoggerError::malformed("exception", e.to_string()))
    }
}

impl<E> From<&E> for ExceptionDetails
where
    E: std::error::Error + 'static,
{
    fn from(error: &E) -> Self {
        ExceptionDetails::from_error(error)
    }
}

fn deserialize_trace<'de, D>(deserializer: D) -> std::result::Result<Vec<CallFrame>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<CallFrame>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Strip the module path from a type name, keeping generics intact
fn short_type_name(full: &str) -> Option<&str> {
    if full.is_empty() {
        return None;
    }
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(idx) => Some(&full[idx + 2..]),
        None => Some(full),
    }
}

/// Best-effort type name for an erased error: the leading identifier of its
/// `Debug` output, e.g. `ParseIntError { kind: InvalidDigit }` -> `ParseIntError`.
fn debug_name<E: std::error::Error + ?Sized>(error: &E) -> String {
    let debug = format!("{:?}", error);
    let name: String = debug
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if name.is_empty() {
        "Error".to_string()
    } else {
        name
    }
}
