//! Call-stack frames attached to events and exceptions

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// How a frame's function was invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CallType {
    /// Instance method call, `->`
    Method,
    /// Associated/static call, `::`
    #[default]
    Static,
    /// Free function call, `()`
    Function,
    /// Closure invocation, `λ`
    Closure,
}

impl CallType {
    pub fn symbol(&self) -> &'static str {
        match self {
            CallType::Method => "->",
            CallType::Static => "::",
            CallType::Function => "()",
            CallType::Closure => "λ",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "->" => Some(CallType::Method),
            "::" => Some(CallType::Static),
            "()" => Some(CallType::Function),
            "λ" => Some(CallType::Closure),
            _ => None,
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single stack entry.
///
/// Every field is optional; a frame with nothing set is considered empty and is
/// discarded during capture. Serializes as
/// `{file, line, function, class, call_type, args}` where `call_type` falls back
/// to `"::"` when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallFrame {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default, with = "call_type_symbol")]
    pub call_type: Option<CallType>,
    #[serde(default, deserialize_with = "deserialize_args")]
    pub args: Option<Vec<String>>,
}

impl CallFrame {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    #[must_use]
    pub fn with_call_type(mut self, call_type: CallType) -> Self {
        self.call_type = Some(call_type);
        self
    }

    /// Attach argument values, sanitized through [`safe_value`]
    ///
    /// An empty argument list leaves `args` unset.
    #[must_use]
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = serde_json::Value>,
    {
        let args: Vec<String> = args.into_iter().map(|arg| safe_value(&arg)).collect();
        self.args = if args.is_empty() { None } else { Some(args) };
        self
    }

    pub fn is_empty(&self) -> bool {
        self.file.is_none()
            && self.line.is_none()
            && self.function.is_none()
            && self.class.is_none()
            && self.call_type.is_none()
            && self.args.is_none()
    }
}

/// Render an arbitrary value as a display-safe string
///
/// Scalars pass through, arrays render as `[a, b]` and objects as
/// `[key: value, ...]`, recursively.
///
/// ```
/// use rust_multisink_logger::core::call_frame::safe_value;
/// use serde_json::json;
///
/// assert_eq!(safe_value(&json!("text")), "text");
/// assert_eq!(safe_value(&json!([1, [true, null]])), "[1, [true, null]]");
/// assert_eq!(safe_value(&json!({"id": 7})), "[id: 7]");
/// ```
pub fn safe_value(value: &serde_json::Value) -> String {
    use serde_json::Value;

    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(safe_value).collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Object(map) => {
            let rendered: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{}: {}", key, safe_value(value)))
                .collect();
            format!("[{}]", rendered.join(", "))
        }
    }
}

fn deserialize_args<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|values| values.iter().map(safe_value).collect()))
}

mod call_type_symbol {
    use super::CallType;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<CallType>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.unwrap_or_default().symbol())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<CallType>, D::Error> {
        let symbol: Option<String> = Option::deserialize(deserializer)?;
        Ok(symbol.as_deref().and_then(CallType::from_symbol))
    }
}
