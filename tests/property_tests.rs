//! Property-based tests for rust_multisink_logger using proptest

use proptest::prelude::*;
use rust_multisink_logger::core::markup::{escape_html, escape_xml};
use rust_multisink_logger::core::output_format::{sanitize_csv, standard_value};
use rust_multisink_logger::prelude::*;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Verbose),
        Just(LogLevel::Info),
        Just(LogLevel::Warning),
        Just(LogLevel::Error),
        Just(LogLevel::Critical),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// A threshold admits exactly the levels at or above it
    #[test]
    fn test_allows_matches_ordering(threshold in any_level(), candidate in any_level()) {
        assert_eq!(threshold.allows(candidate), candidate >= threshold);
    }

    #[test]
    fn test_level_code_roundtrip(level in any_level()) {
        assert_eq!(LogLevel::parse(level.to_str()), level);
        assert_eq!(format!("{}", level), level.to_str());
    }

    /// Unknown input never fails, it falls back to INFO
    #[test]
    fn test_level_parse_is_total(input in "[a-z]{6,12}") {
        let parsed = LogLevel::parse(&input);
        assert!(LogLevel::ALL.contains(&parsed));
    }
}

// ============================================================================
// Event Tests
// ============================================================================

proptest! {
    /// The canonical JSON form reproduces the event
    #[test]
    fn test_event_json_roundtrip(
        name in "[a-zA-Z0-9 _-]{1,20}",
        message in ".*",
        level in any_level(),
        timestamp in 0i64..4_102_444_800i64,
        code in proptest::option::of(any::<i64>())
    ) {
        let mut exception = ExceptionDetails::new("Failure", message.clone());
        if let Some(code) = code {
            exception = exception.with_code(code);
        }
        let event = Event::new(name, level, message)
            .with_timestamp(timestamp)
            .with_exception(Some(exception));

        let json = event.to_json().unwrap();
        assert_eq!(Event::from_json(&json).unwrap(), event);
    }

    /// The JSON-lines record decodes back to the same event
    #[test]
    fn test_standard_form_decodes(
        message in ".*",
        level in any_level(),
        timestamp in 0i64..4_102_444_800i64
    ) {
        let event = Event::new("svc", level, message).with_timestamp(timestamp);
        let value = standard_value(&TimestampFormat::UnixTimestamp, TraceFormat::Full, &event);
        assert_eq!(Event::from_value(&value).unwrap(), event);
    }
}

// ============================================================================
// Renderer Tests
// ============================================================================

proptest! {
    /// Fields with a comma are always wrapped in quotes
    #[test]
    fn test_csv_comma_is_quoted(left in "[a-z]{0,8}", right in "[a-z]{0,8}") {
        let field = format!("{},{}", left, right);
        let sanitized = sanitize_csv(&field);
        assert!(sanitized.starts_with('"') && sanitized.ends_with('"'));
        assert_eq!(&sanitized[1..sanitized.len() - 1], field);
    }

    /// Plain messages keep the record at exactly five fields
    #[test]
    fn test_csv_five_fields(message in "[a-zA-Z0-9 ]*", level in any_level()) {
        let event = Event::new("svc", level, message).with_timestamp(1);
        let line =
            LogFormat::Csv.render(&TimestampFormat::UnixTimestamp, TraceFormat::None, &event);
        assert_eq!(line.split(',').count(), 5);
    }

    /// Escaped markup never contains raw angle brackets
    #[test]
    fn test_markup_escaping(input in ".*") {
        for escaped in [escape_xml(&input), escape_html(&input)] {
            assert!(!escaped.contains('<'));
            assert!(!escaped.contains('>'));
            assert!(!escaped.contains('"'));
        }
    }

    /// Rendering never panics for any format and message
    #[test]
    fn test_render_total(message in ".*", level in any_level(), format in 0u8..5) {
        let format = LogFormat::parse(&format.to_string());
        let event = Event::new("svc", level, message)
            .with_exception(Some(
                ExceptionDetails::new("E", "m").with_previous(ExceptionDetails::new("F", "n")),
            ));
        let _ = format.render(&TimestampFormat::DateTime, TraceFormat::Full, &event);
    }

    /// Any custom pattern renders, falling back to Unix seconds when invalid
    #[test]
    fn test_custom_timestamp_is_total(
        pattern in "[%#:.a-zA-Z0-9 -]{0,12}",
        seconds in 0i64..4_102_444_800i64
    ) {
        let _ = TimestampFormat::Custom(pattern).format(seconds);
    }
}
