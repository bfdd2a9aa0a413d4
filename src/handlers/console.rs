//! Console handler implementation

use crate::core::{
    AnsiFormat, Application, ConsoleConfiguration, Event, ExceptionDetails, Handler, HandlerKind,
    Result, TimestampFormat, TraceFormat,
};
use colored::{Color, Colorize};
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::io::Write;

/// Colors an application name may be drawn in; never black or the default
const NAME_COLORS: [Color; 7] = [
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::White,
];

/// Writes events to stdout (DBG, VRB, INFO) or stderr (WRN, ERR, CRT)
pub struct ConsoleHandler {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
    /// Color picked for each application name, kept for the handler's lifetime
    colors: HashMap<String, Color>,
}

impl ConsoleHandler {
    pub fn new() -> Self {
        Self::with_writers(Box::new(std::io::stdout()), Box::new(std::io::stderr()))
    }

    /// Write to the given streams instead of the process stdout/stderr
    pub fn with_writers(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            err,
            colors: HashMap::new(),
        }
    }

    fn application_color(&mut self, name: &str) -> Color {
        *self.colors.entry(name.to_string()).or_insert_with(|| {
            NAME_COLORS
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(Color::Cyan)
        })
    }

    /// Render the console line for an event, including the trailing newline
    pub fn format_event(&mut self, application: &Application, event: &Event) -> String {
        let config = &application.console;
        let ansi = config.ansi_format == AnsiFormat::Basic;
        let mut parts: Vec<String> = Vec::new();

        if config.timestamp_format != TimestampFormat::None {
            let timestamp = config.timestamp_format.format(event.timestamp());
            parts.push(if ansi {
                timestamp.bold().to_string()
            } else {
                timestamp
            });
        }

        if config.display_name {
            let name = application.name();
            parts.push(if ansi {
                let color = self.application_color(name);
                name.color(color).bold().to_string()
            } else {
                name.to_string()
            });
        }

        if config.display_level {
            let level = event.level().to_str();
            parts.push(if ansi {
                format!("[{}]", level.bold())
            } else {
                format!("[{}]", level)
            });
        }

        if let Some(trace) = first_trace(config, event) {
            parts.push(trace);
        }

        parts.push(event.message().to_string());
        let mut output = parts.join(" ");

        if let Some(exception) = event.exception() {
            exception_block(&mut output, exception, ansi);
        }
        output.push('\n');
        output
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn first_trace(config: &ConsoleConfiguration, event: &Event) -> Option<String> {
    if config.trace_format == TraceFormat::None {
        return None;
    }
    event
        .first_trace()
        .map(|frame| config.trace_format.format(frame))
        .filter(|text| !text.is_empty())
}

fn exception_block(output: &mut String, exception: &ExceptionDetails, ansi: bool) {
    for current in exception.chain() {
        output.push('\n');
        if ansi {
            output.push_str(&current.name.red().bold().to_string());
        } else {
            output.push_str(&current.name);
        }
        if let Some(code) = current.code.filter(|code| *code != 0) {
            output.push_str(&format!(" ({})", code));
        }
        output.push_str(": ");
        output.push_str(&current.message);

        if let Some(file) = current.file.as_deref() {
            output.push_str("\n  File: ");
            output.push_str(file);
            if let Some(line) = current.line.filter(|line| *line != 0) {
                output.push_str(&format!(":{}", line));
            }
        }

        if !current.trace.is_empty() {
            output.push_str("\n  Stack Trace:");
            for frame in &current.trace {
                let text = TraceFormat::Full.format(frame);
                output.push_str("\n    - ");
                if ansi {
                    output.push_str(&text.dimmed().to_string());
                } else {
                    output.push_str(&text);
                }
            }
        }
    }
}

impl Handler for ConsoleHandler {
    fn name(&self) -> &str {
        "console"
    }

    fn kind(&self) -> HandlerKind {
        HandlerKind::Console
    }

    fn is_available(&mut self, _application: &Application) -> bool {
        true
    }

    fn deliver(&mut self, application: &Application, event: &Event) -> Result<()> {
        let output = self.format_event(application, event);

        // Route Warning and above to stderr, others to stdout
        let stream = if event.level().is_error_stream() {
            &mut self.err
        } else {
            &mut self.out
        };
        stream.write_all(output.as_bytes())?;
        stream.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CallFrame, CallType, LogLevel};

    fn plain_app() -> Application {
        Application::new("shop").with_console(
            ConsoleConfiguration::default()
                .with_ansi_format(AnsiFormat::None)
                .with_timestamp_format(TimestampFormat::UnixTimestamp),
        )
    }

    fn event(level: LogLevel) -> Event {
        Event::new("shop", level, "cart saved")
            .with_timestamp(1_700_000_000)
            .with_traces(vec![CallFrame::new()
                .with_function("save")
                .with_class("Cart")
                .with_call_type(CallType::Method)])
    }

    #[test]
    fn test_plain_layout() {
        let mut handler = ConsoleHandler::new();
        let line = handler.format_event(&plain_app(), &event(LogLevel::Info));
        assert_eq!(line, "1700000000 shop [INFO] Cart->save cart saved\n");
    }

    #[test]
    fn test_layout_toggles() {
        let mut app = plain_app();
        app.console = app
            .console
            .with_display_name(false)
            .with_display_level(false)
            .with_trace_format(TraceFormat::None)
            .with_timestamp_format(TimestampFormat::None);

        let mut handler = ConsoleHandler::new();
        assert_eq!(handler.format_event(&app, &event(LogLevel::Info)), "cart saved\n");
    }

    #[test]
    fn test_exception_block() {
        let frame = CallFrame::new()
            .with_file("src/pay.rs")
            .with_line(9)
            .with_function("charge");
        let exception = ExceptionDetails::new("PaymentError", "declined")
            .with_code(402)
            .with_location("src/pay.rs", 10)
            .with_trace(vec![frame])
            .with_previous(ExceptionDetails::new("NetError", "reset"));
        let event = event(LogLevel::Error).with_exception(Some(exception));

        let mut handler = ConsoleHandler::new();
        let line = handler.format_event(&plain_app(), &event);
        assert_eq!(
            line,
            "1700000000 shop [ERR] Cart->save cart saved\n\
             PaymentError (402): declined\n  \
             File: src/pay.rs:10\n  \
             Stack Trace:\n    \
             - charge (src/pay.rs:9)\n\
             NetError: reset\n"
        );
    }

    #[test]
    fn test_ansi_keeps_text() {
        let mut app = plain_app();
        app.console.ansi_format = AnsiFormat::Basic;

        let mut handler = ConsoleHandler::new();
        let line = handler.format_event(&app, &event(LogLevel::Info));
        assert!(line.contains("shop"));
        assert!(line.contains("cart saved"));
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn test_application_color_is_stable() {
        let mut handler = ConsoleHandler::new();
        let first = handler.application_color("shop");
        for _ in 0..10 {
            assert_eq!(handler.application_color("shop"), first);
        }
        assert!(NAME_COLORS.contains(&first));
    }

    #[test]
    fn test_always_available() {
        let mut handler = ConsoleHandler::new();
        assert!(handler.is_available(&plain_app()));
    }
}
