//! Per-application sink configuration

use super::handler::HandlerKind;
use super::output_format::LogFormat;
use super::timestamp::TimestampFormat;
use super::trace_format::TraceFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Port used by the network sinks unless configured otherwise
pub const DEFAULT_PORT: u16 = 5131;

/// Whether console output is decorated with ANSI escape codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnsiFormat {
    None,
    #[default]
    Basic,
}

impl AnsiFormat {
    /// `basic` or `1` enables ANSI output, anything else disables it
    pub fn parse(input: &str) -> Self {
        input.parse().unwrap_or(AnsiFormat::None)
    }
}

impl FromStr for AnsiFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" | "1" => Ok(AnsiFormat::Basic),
            "none" | "0" => Ok(AnsiFormat::None),
            _ => Err(format!("Invalid ANSI format: '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfiguration {
    pub enabled: bool,
    pub display_name: bool,
    pub display_level: bool,
    pub ansi_format: AnsiFormat,
    pub trace_format: TraceFormat,
    pub timestamp_format: TimestampFormat,
}

impl Default for ConsoleConfiguration {
    fn default() -> Self {
        Self {
            enabled: true,
            display_name: true,
            display_level: true,
            ansi_format: AnsiFormat::Basic,
            trace_format: TraceFormat::Basic,
            timestamp_format: TimestampFormat::TimeOnly,
        }
    }
}

impl ConsoleConfiguration {
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: bool) -> Self {
        self.display_name = display_name;
        self
    }

    #[must_use]
    pub fn with_display_level(mut self, display_level: bool) -> Self {
        self.display_level = display_level;
        self
    }

    #[must_use]
    pub fn with_ansi_format(mut self, ansi_format: AnsiFormat) -> Self {
        self.ansi_format = ansi_format;
        self
    }

    #[must_use]
    pub fn with_trace_format(mut self, trace_format: TraceFormat) -> Self {
        self.trace_format = trace_format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, timestamp_format: TimestampFormat) -> Self {
        self.timestamp_format = timestamp_format;
        self
    }
}

/// Raw descriptor sink, e.g. `/dev/stderr` or a named pipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorConfiguration {
    pub enabled: bool,
    pub path: PathBuf,
    pub append_newline: bool,
    pub log_format: LogFormat,
    pub timestamp_format: TimestampFormat,
    pub trace_format: TraceFormat,
}

impl Default for DescriptorConfiguration {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("/dev/null"),
            append_newline: false,
            log_format: LogFormat::Jsonl,
            timestamp_format: TimestampFormat::UnixTimestamp,
            trace_format: TraceFormat::Full,
        }
    }
}

impl DescriptorConfiguration {
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_append_newline(mut self, append_newline: bool) -> Self {
        self.append_newline = append_newline;
        self
    }

    #[must_use]
    pub fn with_log_format(mut self, log_format: LogFormat) -> Self {
        self.log_format = log_format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, timestamp_format: TimestampFormat) -> Self {
        self.timestamp_format = timestamp_format;
        self
    }

    #[must_use]
    pub fn with_trace_format(mut self, trace_format: TraceFormat) -> Self {
        self.trace_format = trace_format;
        self
    }
}

/// Daily log files under `path`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfiguration {
    pub enabled: bool,
    /// Directory the log files are written to
    pub path: PathBuf,
    /// Mode bits applied to new files and restored when writability drifts
    pub default_permissions: u32,
    pub append_newline: bool,
    pub log_format: LogFormat,
    pub timestamp_format: TimestampFormat,
    pub trace_format: TraceFormat,
}

impl Default for FileConfiguration {
    fn default() -> Self {
        Self {
            enabled: true,
            path: std::env::temp_dir().join("logs"),
            default_permissions: 0o777,
            append_newline: true,
            log_format: LogFormat::Txt,
            timestamp_format: TimestampFormat::TimeOnly,
            trace_format: TraceFormat::Basic,
        }
    }
}

impl FileConfiguration {
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_default_permissions(mut self, mode: u32) -> Self {
        self.default_permissions = mode;
        self
    }

    #[must_use]
    pub fn with_append_newline(mut self, append_newline: bool) -> Self {
        self.append_newline = append_newline;
        self
    }

    #[must_use]
    pub fn with_log_format(mut self, log_format: LogFormat) -> Self {
        self.log_format = log_format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, timestamp_format: TimestampFormat) -> Self {
        self.timestamp_format = timestamp_format;
        self
    }

    #[must_use]
    pub fn with_trace_format(mut self, trace_format: TraceFormat) -> Self {
        self.trace_format = trace_format;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfiguration {
    pub enabled: bool,
    pub endpoint: String,
    pub append_newline: bool,
    pub log_format: LogFormat,
    pub timestamp_format: TimestampFormat,
    pub trace_format: TraceFormat,
}

impl Default for HttpConfiguration {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: format!("http://0.0.0.0:{}", DEFAULT_PORT),
            append_newline: false,
            log_format: LogFormat::Jsonl,
            timestamp_format: TimestampFormat::UnixTimestamp,
            trace_format: TraceFormat::Full,
        }
    }
}

impl HttpConfiguration {
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_append_newline(mut self, append_newline: bool) -> Self {
        self.append_newline = append_newline;
        self
    }

    #[must_use]
    pub fn with_log_format(mut self, log_format: LogFormat) -> Self {
        self.log_format = log_format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, timestamp_format: TimestampFormat) -> Self {
        self.timestamp_format = timestamp_format;
        self
    }

    #[must_use]
    pub fn with_trace_format(mut self, trace_format: TraceFormat) -> Self {
        self.trace_format = trace_format;
        self
    }
}

/// Shared shape of the TCP and UDP sink settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketConfiguration {
    pub enabled: bool,
    /// Must be an IP literal; host names are not resolved
    pub host: String,
    pub port: u16,
    pub append_newline: bool,
    pub log_format: LogFormat,
    pub timestamp_format: TimestampFormat,
    pub trace_format: TraceFormat,
}

pub type TcpConfiguration = SocketConfiguration;
pub type UdpConfiguration = SocketConfiguration;

impl Default for SocketConfiguration {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            append_newline: false,
            log_format: LogFormat::Jsonl,
            timestamp_format: TimestampFormat::UnixTimestamp,
            trace_format: TraceFormat::Full,
        }
    }
}

impl SocketConfiguration {
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_append_newline(mut self, append_newline: bool) -> Self {
        self.append_newline = append_newline;
        self
    }

    #[must_use]
    pub fn with_log_format(mut self, log_format: LogFormat) -> Self {
        self.log_format = log_format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, timestamp_format: TimestampFormat) -> Self {
        self.timestamp_format = timestamp_format;
        self
    }

    #[must_use]
    pub fn with_trace_format(mut self, trace_format: TraceFormat) -> Self {
        self.trace_format = trace_format;
        self
    }

    /// `host:port`, bracketing IPv6 literals
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// One named application and its sink settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub name: String,
    pub console: ConsoleConfiguration,
    pub descriptor: DescriptorConfiguration,
    pub file: FileConfiguration,
    pub http: HttpConfiguration,
    pub tcp: TcpConfiguration,
    pub udp: UdpConfiguration,
}

impl Application {
    /// An application with the built-in sink settings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            console: ConsoleConfiguration::default(),
            descriptor: DescriptorConfiguration::default(),
            file: FileConfiguration::default(),
            http: HttpConfiguration::default(),
            tcp: TcpConfiguration::default(),
            udp: UdpConfiguration::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enabled flag of the sink of the given kind; custom sinks are always enabled
    pub fn is_enabled(&self, kind: HandlerKind) -> bool {
        match kind {
            HandlerKind::Console => self.console.enabled,
            HandlerKind::Descriptor => self.descriptor.enabled,
            HandlerKind::File => self.file.enabled,
            HandlerKind::Http => self.http.enabled,
            HandlerKind::Tcp => self.tcp.enabled,
            HandlerKind::Udp => self.udp.enabled,
            HandlerKind::Custom => true,
        }
    }

    #[must_use]
    pub fn with_console(mut self, console: ConsoleConfiguration) -> Self {
        self.console = console;
        self
    }

    #[must_use]
    pub fn with_descriptor(mut self, descriptor: DescriptorConfiguration) -> Self {
        self.descriptor = descriptor;
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: FileConfiguration) -> Self {
        self.file = file;
        self
    }

    #[must_use]
    pub fn with_http(mut self, http: HttpConfiguration) -> Self {
        self.http = http;
        self
    }

    #[must_use]
    pub fn with_tcp(mut self, tcp: TcpConfiguration) -> Self {
        self.tcp = tcp;
        self
    }

    #[must_use]
    pub fn with_udp(mut self, udp: UdpConfiguration) -> Self {
        self.udp = udp;
        self
    }

    /// Turn every sink off; handy before enabling exactly the ones needed
    #[must_use]
    pub fn with_all_disabled(mut self) -> Self {
        self.console.enabled = false;
        self.descriptor.enabled = false;
        self.file.enabled = false;
        self.http.enabled = false;
        self.tcp.enabled = false;
        self.udp.enabled = false;
        self
    }
}

impl std::fmt::Display for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
