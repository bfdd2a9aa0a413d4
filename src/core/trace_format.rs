//! Single-frame trace rendering

use super::call_frame::CallFrame;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How much of a frame to print next to a log message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceFormat {
    /// Nothing
    None,
    /// `class::function`, falling back to `file:line` when there is no function
    #[default]
    Basic,
    /// `class::function (file:line)`
    Full,
}

impl TraceFormat {
    pub fn format(&self, frame: &CallFrame) -> String {
        match self {
            TraceFormat::None => String::new(),
            TraceFormat::Basic => format_basic(frame),
            TraceFormat::Full => format_full(frame),
        }
    }

    /// Parse a format name or ordinal, falling back to [`TraceFormat::Basic`]
    pub fn parse(input: &str) -> Self {
        input.parse().unwrap_or_default()
    }
}

impl FromStr for TraceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "0" => Ok(TraceFormat::None),
            "basic" | "1" => Ok(TraceFormat::Basic),
            "full" | "2" => Ok(TraceFormat::Full),
            _ => Err(format!("Invalid trace format: '{}'", s)),
        }
    }
}

fn file_and_line(frame: &CallFrame) -> Option<String> {
    let file = frame.file.as_deref()?;
    Some(match frame.line {
        Some(line) => format!("{}:{}", file, line),
        None => file.to_string(),
    })
}

fn format_basic(frame: &CallFrame) -> String {
    let call = frame.call_type.unwrap_or_default().symbol();

    let Some(function) = frame.function.as_deref() else {
        if let Some(class) = frame.class.as_deref() {
            return class.to_string();
        }
        return file_and_line(frame).unwrap_or_default();
    };

    if let Some(class) = frame.class.as_deref() {
        return format!("{}{}{}", class, call, function);
    }
    match file_and_line(frame) {
        Some(location) => format!("{} {}{}", location, call, function),
        None => function.to_string(),
    }
}

fn format_full(frame: &CallFrame) -> String {
    let mut output = String::new();
    if let Some(class) = frame.class.as_deref() {
        output.push_str(class);
    }
    if let Some(call_type) = frame.call_type {
        output.push_str(call_type.symbol());
    }
    if let Some(function) = frame.function.as_deref() {
        output.push_str(function);
    }
    if let Some(location) = file_and_line(frame) {
        output.push_str(" (");
        output.push_str(&location);
        output.push(')');
    }
    output
}
