//! Core logger types and traits

pub mod call_frame;
pub mod capture;
pub mod config;
pub mod defaults;
pub mod error;
pub mod event;
pub mod exception;
pub mod handler;
pub mod log_level;
pub mod logger;
pub mod markup;
pub mod metrics;
pub mod output_format;
pub mod timestamp;
pub mod trace_format;

pub use call_frame::{safe_value, CallFrame, CallType};
pub use capture::capture_backtrace;
pub use config::{
    AnsiFormat, Application, ConsoleConfiguration, DescriptorConfiguration, FileConfiguration,
    HttpConfiguration, SocketConfiguration, TcpConfiguration, UdpConfiguration, DEFAULT_PORT,
};
pub use defaults::{Defaults, DEFAULT_BACKTRACE_LEVEL};
pub use error::{LoggerError, Result};
pub use event::Event;
pub use exception::ExceptionDetails;
pub use handler::{Handler, HandlerKind};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use output_format::LogFormat;
pub use timestamp::TimestampFormat;
pub use trace_format::TraceFormat;
