//! Handler implementations

pub mod console;
pub mod descriptor;
pub mod file;
pub mod file_lock;
#[cfg(feature = "http")]
pub mod http;
pub mod tcp;
pub mod udp;

pub use console::ConsoleHandler;
pub use descriptor::DescriptorHandler;
pub use file::FileHandler;
pub use file_lock::FileLock;
#[cfg(feature = "http")]
pub use http::HttpHandler;
pub use tcp::TcpHandler;
pub use udp::UdpHandler;

// Re-export the trait for handler authors
pub use crate::core::{Handler, HandlerKind};

use crate::core::{Event, LogFormat, TimestampFormat, TraceFormat};

/// Largest payload a socket handler will send in one write
pub const MAX_DATAGRAM_SIZE: usize = 65535;

/// The built-in handlers in dispatch order: console, descriptor, file, http, tcp, udp
pub fn default_handlers() -> Vec<Box<dyn Handler>> {
    let mut handlers: Vec<Box<dyn Handler>> = vec![
        Box::new(ConsoleHandler::new()),
        Box::new(DescriptorHandler::new()),
        Box::new(FileHandler::new()),
    ];
    #[cfg(feature = "http")]
    handlers.push(Box::new(HttpHandler::new()));
    handlers.push(Box::new(TcpHandler::new()));
    handlers.push(Box::new(UdpHandler::new()));
    handlers
}

/// Render an event for a sink, adding the platform newline when configured
pub(crate) fn render_message(
    format: LogFormat,
    timestamp: &TimestampFormat,
    trace: TraceFormat,
    append_newline: bool,
    event: &Event,
) -> String {
    let mut message = format.render(timestamp, trace, event);
    if append_newline {
        message.push_str(LINE_ENDING);
    }
    message
}

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    #[test]
    fn test_default_order() {
        let kinds: Vec<HandlerKind> = default_handlers().iter().map(|h| h.kind()).collect();
        let expected: Vec<HandlerKind> = HandlerKind::BUILT_IN
            .iter()
            .copied()
            .filter(|kind| cfg!(feature = "http") || *kind != HandlerKind::Http)
            .collect();
        assert_eq!(kinds, expected);
    }

    #[test]
    fn test_render_message_newline() {
        let event = Event::new("app", LogLevel::Info, "hi").with_timestamp(5);
        let none = TimestampFormat::None;
        let plain = render_message(LogFormat::Txt, &none, TraceFormat::None, false, &event);
        let lined = render_message(LogFormat::Txt, &none, TraceFormat::None, true, &event);
        assert_eq!(lined, format!("{}{}", plain, LINE_ENDING));
        assert!(!plain.ends_with('\n'));
    }
}
