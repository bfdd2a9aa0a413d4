//! # Rust Multisink Logger
//!
//! A structured application logger that fans every event out to several
//! destinations at once: console, a daily log file, an existing descriptor,
//! TCP, UDP and HTTP.
//!
//! ## Features
//!
//! - **Structured Events**: Level, message, backtrace and a full exception chain
//! - **Multiple Formats**: JSONL, CSV, plain text, XML and HTML renderers
//! - **Failure Isolation**: A failing or panicking sink never affects the others
//! - **Environment Configuration**: Process defaults seeded once from `LOGLIB_*` variables
//!
//! ```
//! use rust_multisink_logger::prelude::*;
//!
//! let app = Application::new("worker")
//!     .with_all_disabled()
//!     .with_console(ConsoleConfiguration::default().with_ansi_format(AnsiFormat::None));
//!
//! let logger = Logger::builder("worker").application(app).build();
//! logger.info("started");
//! logger.error_with("job failed", ExceptionDetails::new("Timeout", "no reply in 30s"));
//! ```

pub mod core;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        AnsiFormat, Application, CallFrame, ConsoleConfiguration, Defaults,
        DescriptorConfiguration, Event, ExceptionDetails, FileConfiguration, Handler, HandlerKind,
        HttpConfiguration, LogFormat, LogLevel, Logger, LoggerBuilder, LoggerError, LoggerMetrics,
        Result, TcpConfiguration, TimestampFormat, TraceFormat, UdpConfiguration,
    };
}

pub use crate::core::{
    capture_backtrace, safe_value, AnsiFormat, Application, CallFrame, CallType,
    ConsoleConfiguration, Defaults, DescriptorConfiguration, Event, ExceptionDetails,
    FileConfiguration, Handler, HandlerKind, HttpConfiguration, LogFormat, LogLevel, Logger,
    LoggerBuilder, LoggerError, LoggerMetrics, Result, SocketConfiguration, TcpConfiguration,
    TimestampFormat, TraceFormat, UdpConfiguration,
};
pub use handlers::{
    ConsoleHandler, DescriptorHandler, FileHandler, FileLock, TcpHandler, UdpHandler,
};
#[cfg(feature = "http")]
pub use handlers::HttpHandler;
