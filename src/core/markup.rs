//! XML and HTML renderers

use super::call_frame::CallFrame;
use super::event::Event;
use super::exception::ExceptionDetails;
use super::timestamp::TimestampFormat;
use super::trace_format::TraceFormat;

/// Escape text content for XML
pub fn escape_xml(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape text content for HTML, quotes included
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Minimal indented element tree, two spaces per level
struct XmlWriter {
    output: String,
    depth: usize,
}

impl XmlWriter {
    fn new() -> Self {
        Self {
            output: String::new(),
            depth: 0,
        }
    }

    fn indent(&mut self) {
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        for _ in 0..self.depth {
            self.output.push_str("  ");
        }
    }

    fn open(&mut self, tag: &str) {
        self.indent();
        self.output.push('<');
        self.output.push_str(tag);
        self.output.push('>');
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth -= 1;
        self.indent();
        self.output.push_str("</");
        self.output.push_str(tag);
        self.output.push('>');
    }

    fn leaf(&mut self, tag: &str, text: &str) {
        self.indent();
        if text.is_empty() {
            self.output.push_str(&format!("<{}/>", tag));
        } else {
            self.output
                .push_str(&format!("<{}>{}</{}>", tag, escape_xml(text), tag));
        }
    }

    /// A container that may turn out to have no children
    fn list<T>(&mut self, tag: &str, items: &[T], mut each: impl FnMut(&mut Self, &T)) {
        if items.is_empty() {
            self.indent();
            self.output.push_str(&format!("<{}/>", tag));
            return;
        }
        self.open(tag);
        for item in items {
            each(self, item);
        }
        self.close(tag);
    }

    fn finish(self) -> String {
        self.output
    }
}

/// Render an event as an `<event>` document element
pub fn render_xml(timestamp: &TimestampFormat, trace: TraceFormat, event: &Event) -> String {
    let mut xml = XmlWriter::new();
    xml.open("event");
    xml.leaf("application_name", event.application_name());
    xml.leaf("timestamp", &timestamp.format(event.timestamp()));
    xml.leaf("level", event.level().to_str());
    // Carries the level code rather than the message text.
    xml.leaf("message", event.level().to_str());

    if trace != TraceFormat::None {
        if let Some(first) = event.first_trace() {
            xml.leaf("trace", &trace.format(first));
        }
    }

    if !event.traces().is_empty() {
        xml.list("stack_trace", event.traces(), frame_to_xml);
    }

    if let Some(exception) = event.exception() {
        xml.open("exception");
        exception_to_xml(&mut xml, exception);
        xml.close("exception");
    }

    xml.close("event");
    xml.finish()
}

fn exception_to_xml(xml: &mut XmlWriter, exception: &ExceptionDetails) {
    xml.leaf("name", &exception.name);
    xml.leaf("message", &exception.message);
    if let Some(code) = exception.code {
        xml.leaf("code", &code.to_string());
    }
    if let Some(file) = exception.file.as_deref() {
        xml.leaf("file", file);
    }
    if let Some(line) = exception.line {
        xml.leaf("line", &line.to_string());
    }
    xml.list("stack_trace", &exception.trace, frame_to_xml);

    if let Some(previous) = exception.previous.as_deref() {
        xml.open("previous");
        exception_to_xml(xml, previous);
        xml.close("previous");
    }
}

fn frame_to_xml(xml: &mut XmlWriter, frame: &CallFrame) {
    xml.open("trace");
    if let Some(file) = frame.file.as_deref() {
        xml.leaf("file", file);
    }
    if let Some(line) = frame.line {
        xml.leaf("line", &line.to_string());
    }
    if let Some(function) = frame.function.as_deref() {
        xml.leaf("function", function);
    }
    if let Some(class) = frame.class.as_deref() {
        xml.leaf("class", class);
    }
    if let Some(call_type) = frame.call_type {
        xml.leaf("call_type", call_type.symbol());
    }
    if let Some(args) = frame.args.as_deref() {
        xml.list("arguments", args, |xml, arg| {
            xml.leaf("argument", &quoted(arg));
        });
    }
    xml.close("trace");
}

/// Render an event as a `log-entry` block
pub fn render_html(timestamp: &TimestampFormat, trace: TraceFormat, event: &Event) -> String {
    let mut html = String::from("<div class=\"log-entry\">");
    html.push_str(&format!(
        "<p><strong>Timestamp:</strong> {}</p>",
        escape_html(&timestamp.format(event.timestamp()))
    ));
    html.push_str(&format!(
        "<p><strong>Level:</strong> {}</p>",
        event.level().to_str()
    ));
    html.push_str(&format!(
        "<p><strong>Message:</strong> {}</p>",
        escape_html(event.message())
    ));

    if trace != TraceFormat::None {
        if let Some(first) = event.first_trace() {
            html.push_str(&format!(
                "<p><strong>Backtrace:</strong> {}</p>",
                escape_html(&trace.format(first))
            ));
        }
    }

    if let Some(exception) = event.exception() {
        html.push_str("<p><strong>Exception Details:</strong></p>");
        exception_to_html(&mut html, exception);
    }

    html.push_str("</div>");
    html
}

fn exception_to_html(html: &mut String, exception: &ExceptionDetails) {
    html.push_str("<div class=\"exception-details\">");
    html.push_str(&format!(
        "<p><strong>{}:</strong> {} (Code: {})</p>",
        escape_html(&exception.name),
        escape_html(&exception.message),
        exception
            .code
            .map_or_else(|| "N/A".to_string(), |code| code.to_string())
    ));

    if let Some(file) = exception.file.as_deref() {
        html.push_str(&format!("<p><strong>File:</strong> {}</p>", escape_html(file)));
        if let Some(line) = exception.line {
            html.push_str(&format!("<p><strong>Line:</strong> {}</p>", line));
        }
    }

    html.push_str("<p><strong>Stack Trace:</strong></p><ul>");
    for frame in &exception.trace {
        html.push_str("<li>");
        frame_to_html(html, frame);
        html.push_str("</li>");
    }
    html.push_str("</ul>");

    if let Some(previous) = exception.previous.as_deref() {
        html.push_str("<p><strong>Caused by:</strong></p>");
        exception_to_html(html, previous);
    }

    html.push_str("</div>");
}

fn frame_to_html(html: &mut String, frame: &CallFrame) {
    html.push_str("<div class=\"stack-trace\">");
    if let Some(file) = frame.file.as_deref() {
        html.push_str(&format!("<p><strong>File:</strong> {}</p>", escape_html(file)));
    }
    if let Some(line) = frame.line {
        html.push_str(&format!("<p><strong>Line:</strong> {}</p>", line));
    }
    if let Some(function) = frame.function.as_deref() {
        html.push_str(&format!(
            "<p><strong>Function:</strong> {}</p>",
            escape_html(function)
        ));
    }
    if let Some(class) = frame.class.as_deref() {
        html.push_str(&format!("<p><strong>Class:</strong> {}</p>", escape_html(class)));
    }
    if let Some(call_type) = frame.call_type {
        html.push_str(&format!(
            "<p><strong>Call Type:</strong> {}</p>",
            escape_html(call_type.symbol())
        ));
    }
    if let Some(args) = frame.args.as_deref() {
        html.push_str("<p><strong>Arguments:</strong></p><ul>");
        for arg in args {
            html.push_str(&format!("<li>{}</li>", escape_html(&quoted(arg))));
        }
        html.push_str("</ul>");
    }
    html.push_str("</div>");
}

/// Arguments are written as JSON string literals
fn quoted(arg: &str) -> String {
    serde_json::to_string(arg).unwrap_or_else(|_| arg.to_string())
}
