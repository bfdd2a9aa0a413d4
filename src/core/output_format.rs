//! Output formats for events
//!
//! Every sink renders through [`LogFormat::render`]:
//! - Jsonl: the standard record as a single JSON line
//! - Csv: `timestamp,level,message,trace,exception`
//! - Txt: human-readable text with an exception block
//! - Xml: an `<event>` document
//! - Html: a `log-entry` block

use super::call_frame::CallFrame;
use super::event::Event;
use super::exception::ExceptionDetails;
use super::log_level::LogLevel;
use super::markup;
use super::timestamp::TimestampFormat;
use super::trace_format::TraceFormat;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Header row written once at the top of CSV log files
pub const CSV_HEADER: &str = "timestamp,level,message,trace,exception";

/// Output format for events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    /// One JSON object per line (default)
    ///
    /// Example:
    /// `{"application_name":"api","timestamp":1736332245,"level":"INFO",
    /// "message":"ready","stack_trace":[],"exception":null}`
    #[default]
    Jsonl,

    /// Example: `10:30:45,INFO,ready,-,-`
    Csv,

    /// Example: `10:30:45 [INFO] Server::start ready`
    Txt,

    Xml,

    Html,
}

impl LogFormat {
    /// Render an event according to this format
    pub fn render(&self, timestamp: &TimestampFormat, trace: TraceFormat, event: &Event) -> String {
        match self {
            LogFormat::Jsonl => format_jsonl(timestamp, trace, event),
            LogFormat::Csv => format_csv(timestamp, trace, event),
            LogFormat::Txt => format_txt(timestamp, trace, event),
            LogFormat::Xml => markup::render_xml(timestamp, trace, event),
            LogFormat::Html => markup::render_html(timestamp, trace, event),
        }
    }

    /// Parse a format name or ordinal, falling back to [`LogFormat::Jsonl`]
    pub fn parse(input: &str) -> Self {
        input.parse().unwrap_or_default()
    }

    /// `Content-Type` used when the rendered event is POSTed
    pub fn content_type(&self) -> &'static str {
        match self {
            LogFormat::Jsonl => "application/json",
            LogFormat::Csv => "text/csv",
            LogFormat::Txt => "text/plain",
            LogFormat::Xml => "text/xml",
            LogFormat::Html => "text/html",
        }
    }

    /// File extension for log files in this format
    pub fn extension(&self) -> &'static str {
        match self {
            LogFormat::Jsonl => "jsonl",
            LogFormat::Csv => "csv",
            LogFormat::Txt => "txt",
            LogFormat::Xml => "xml",
            LogFormat::Html => "html",
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jsonl" | "json" | "0" => Ok(LogFormat::Jsonl),
            "csv" | "1" => Ok(LogFormat::Csv),
            "txt" | "text" | "2" => Ok(LogFormat::Txt),
            "xml" | "3" => Ok(LogFormat::Xml),
            "html" | "4" => Ok(LogFormat::Html),
            _ => Err(format!("Invalid log format: '{}'", s)),
        }
    }
}

/// Standard record: the canonical event with `stack_trace` in place of
/// `traces`, a formatted timestamp and the rendered first frame.
#[derive(Serialize)]
struct StandardRecord<'a> {
    application_name: &'a str,
    timestamp: serde_json::Value,
    level: LogLevel,
    message: &'a str,
    stack_trace: &'a [CallFrame],
    exception: Option<&'a ExceptionDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<String>,
}

/// Timestamp as it appears in JSON output: a number for the Unix formats
fn format_timestamp_json(timestamp: &TimestampFormat, seconds: i64) -> serde_json::Value {
    if timestamp.is_numeric() {
        serde_json::Value::Number(seconds.into())
    } else {
        serde_json::Value::String(timestamp.format(seconds))
    }
}

/// The standard record as a JSON value
pub fn standard_value(
    timestamp: &TimestampFormat,
    trace: TraceFormat,
    event: &Event,
) -> serde_json::Value {
    serde_json::to_value(standard_record(timestamp, trace, event))
        .unwrap_or(serde_json::Value::Null)
}

fn standard_record<'a>(
    timestamp: &TimestampFormat,
    trace: TraceFormat,
    event: &'a Event,
) -> StandardRecord<'a> {
    StandardRecord {
        application_name: event.application_name(),
        timestamp: format_timestamp_json(timestamp, event.timestamp()),
        level: event.level(),
        message: event.message(),
        stack_trace: event.traces(),
        exception: event.exception(),
        trace: event.first_trace().map(|frame| trace.format(frame)),
    }
}

fn format_jsonl(timestamp: &TimestampFormat, trace: TraceFormat, event: &Event) -> String {
    serde_json::to_string(&standard_record(timestamp, trace, event)).unwrap_or_default()
}

fn first_trace_text(trace: TraceFormat, event: &Event) -> Option<String> {
    if trace == TraceFormat::None {
        return None;
    }
    event.first_trace().map(|frame| trace.format(frame))
}

fn format_csv(timestamp: &TimestampFormat, trace: TraceFormat, event: &Event) -> String {
    let trace_field = first_trace_text(trace, event)
        .map(|text| sanitize_csv(&text))
        .unwrap_or_else(|| "-".to_string());

    let exception_field = event
        .exception()
        .and_then(|exception| serde_json::to_string(exception).ok())
        .map(|json| sanitize_csv(&json))
        .unwrap_or_else(|| "-".to_string());

    [
        sanitize_csv(&timestamp.format(event.timestamp())),
        sanitize_csv(event.level().to_str()),
        sanitize_csv(event.message()),
        trace_field,
        exception_field,
    ]
    .join(",")
}

/// Quote a CSV field when it holds a comma, a quote or a literal `\n`
/// (backslash followed by `n`); embedded quotes are doubled.
pub fn sanitize_csv(value: &str) -> String {
    let escaped = value.replace('"', "\"\"");
    if escaped.contains(',') || escaped.contains("\\n") || escaped.contains('"') {
        format!("\"{}\"", escaped)
    } else {
        escaped
    }
}

fn format_txt(timestamp: &TimestampFormat, trace: TraceFormat, event: &Event) -> String {
    let mut output = String::new();
    if *timestamp != TimestampFormat::None {
        output.push_str(&timestamp.format(event.timestamp()));
        output.push(' ');
    }

    output.push_str(&format!("[{}] ", event.level().to_str()));

    if let Some(text) = first_trace_text(trace, event) {
        output.push_str(&text);
        output.push(' ');
    }

    output.push_str(event.message());
    if let Some(exception) = event.exception() {
        exception_to_text(&mut output, exception);
    }
    output
}

/// Exception block appended to text output, one entry per cause
fn exception_to_text(output: &mut String, exception: &ExceptionDetails) {
    for current in exception.chain() {
        output.push('\n');
        output.push_str(&current.name);
        if let Some(code) = current.code.filter(|code| *code != 0) {
            output.push_str(&format!(" ({})", code));
        }
        output.push_str(": ");
        output.push_str(&current.message);

        if let Some(file) = current.file.as_deref() {
            output.push_str("\nFile: ");
            output.push_str(file);
            if let Some(line) = current.line {
                output.push_str(&format!(":{}", line));
            }
        }

        output.push('\n');
        for frame in &current.trace {
            output.push_str("  ");
            output.push_str(&TraceFormat::Full.format(frame));
            output.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::call_frame::CallType;

    const UNIX: TimestampFormat = TimestampFormat::UnixTimestamp;

    fn frame() -> CallFrame {
        CallFrame::new()
            .with_file("src/api.rs")
            .with_line(21)
            .with_function("handle")
            .with_class("Api")
            .with_call_type(CallType::Static)
    }

    fn plain_event(message: &str) -> Event {
        Event::new("api", LogLevel::Info, message).with_timestamp(1_736_332_245)
    }

    fn failing_event() -> Event {
        Event::new("api", LogLevel::Error, "request failed")
            .with_timestamp(1_736_332_245)
            .with_traces(vec![frame()])
            .with_exception(Some(
                ExceptionDetails::new("HandlerError", "bad gateway")
                    .with_code(502)
                    .with_location("src/api.rs", 30)
                    .with_trace(vec![frame()])
                    .with_previous(ExceptionDetails::new("ConnectError", "refused").with_code(0)),
            ))
    }

    #[test]
    fn test_txt_format() {
        let result = LogFormat::Txt.render(&UNIX, TraceFormat::Basic, &plain_event("ready"));
        assert_eq!(result, "1736332245 [INFO] ready");

        let with_trace = plain_event("ready").with_traces(vec![frame()]);
        let result = LogFormat::Txt.render(&TimestampFormat::None, TraceFormat::Basic, &with_trace);
        assert_eq!(result, "[INFO] Api::handle ready");
    }

    #[test]
    fn test_invalid_custom_timestamp_renders_unix_seconds() {
        let custom = TimestampFormat::Custom("%Q".to_string());
        for format in [LogFormat::Txt, LogFormat::Csv, LogFormat::Xml, LogFormat::Html] {
            let result = format.render(&custom, TraceFormat::None, &plain_event("ready"));
            assert!(result.contains("1736332245"), "{:?}: {}", format, result);
        }
        let result = LogFormat::Jsonl.render(&custom, TraceFormat::None, &plain_event("ready"));
        assert!(result.contains("\"timestamp\":\"1736332245\""));
    }

    #[test]
    fn test_txt_exception_block() {
        let result =
            LogFormat::Txt.render(&TimestampFormat::None, TraceFormat::None, &failing_event());
        assert_eq!(
            result,
            "[ERR] request failed\n\
             HandlerError (502): bad gateway\n\
             File: src/api.rs:30\n  \
             Api::handle (src/api.rs:21)\n\
             \n\
             ConnectError: refused\n"
        );
    }

    #[test]
    fn test_csv_format() {
        let result = LogFormat::Csv.render(&UNIX, TraceFormat::Basic, &plain_event("ready"));
        assert_eq!(result, "1736332245,INFO,ready,-,-");
    }

    #[test]
    fn test_csv_quotes_commas_and_quotes() {
        let result = LogFormat::Csv.render(&UNIX, TraceFormat::None, &plain_event("a,b"));
        assert_eq!(result, "1736332245,INFO,\"a,b\",-,-");

        assert_eq!(sanitize_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(sanitize_csv("literal \\n here"), "\"literal \\n here\"");
        assert_eq!(sanitize_csv("real\nnewline"), "real\nnewline");
    }

    #[test]
    fn test_csv_exception_is_json() {
        let result = LogFormat::Csv.render(&UNIX, TraceFormat::Full, &failing_event());
        assert!(result.starts_with(
            "1736332245,ERR,request failed,Api::handle (src/api.rs:21),\"{"
        ));
        assert!(result.contains("\"\"name\"\":\"\"HandlerError\"\""));
        assert!(result.ends_with("}\""));
    }

    #[test]
    fn test_jsonl_format() {
        let result = LogFormat::Jsonl.render(&UNIX, TraceFormat::Basic, &failing_event());
        assert!(!result.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["application_name"], "api");
        assert_eq!(parsed["timestamp"], 1_736_332_245);
        assert_eq!(parsed["level"], "ERR");
        assert_eq!(parsed["trace"], "Api::handle");
        assert_eq!(parsed["stack_trace"][0]["call_type"], "::");
        assert_eq!(parsed["exception"]["previous"]["name"], "ConnectError");
        assert!(parsed.get("traces").is_none());

        let back = Event::from_value(&parsed).unwrap();
        assert_eq!(back, failing_event());
    }

    #[test]
    fn test_jsonl_key_order_and_unescaped_text() {
        let none = TimestampFormat::None;
        let result = LogFormat::Jsonl.render(&none, TraceFormat::Basic, &plain_event("path/to/é"));
        assert!(result.starts_with(
            "{\"application_name\":\"api\",\"timestamp\":1736332245,\"level\":\"INFO\",\
             \"message\":\"path/to/é\""
        ));
        assert!(!result.contains("\"trace\""));
    }

    #[test]
    fn test_jsonl_string_timestamp() {
        let value =
            standard_value(&TimestampFormat::DateOnly, TraceFormat::Basic, &plain_event("m"));
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_parse() {
        assert_eq!(LogFormat::parse("CSV"), LogFormat::Csv);
        assert_eq!(LogFormat::parse("2"), LogFormat::Txt);
        assert_eq!(LogFormat::parse("xml"), LogFormat::Xml);
        assert_eq!(LogFormat::parse("4"), LogFormat::Html);
        assert_eq!(LogFormat::parse("yaml"), LogFormat::Jsonl);
    }

    #[test]
    fn test_content_type_and_extension() {
        assert_eq!(LogFormat::Jsonl.content_type(), "application/json");
        assert_eq!(LogFormat::Csv.content_type(), "text/csv");
        assert_eq!(LogFormat::Txt.content_type(), "text/plain");
        assert_eq!(LogFormat::Xml.content_type(), "text/xml");
        assert_eq!(LogFormat::Html.content_type(), "text/html");
        assert_eq!(LogFormat::Html.extension(), "html");
        assert_eq!(LogFormat::Jsonl.extension(), "jsonl");
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(LogFormat::default(), LogFormat::Jsonl);
    }
}
