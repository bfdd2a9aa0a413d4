//! Process-wide defaults seeded from the environment
//!
//! Recognized variables:
//!
//! | Variable | Meaning |
//! |---|---|
//! | `LOG_LEVEL` | minimum level (`debug`, `wrn`, `3`, ...) |
//! | `LOGLIB_BACKTRACE_LEVEL` | frames skipped when capturing a backtrace |
//! | `LOGLIB_<SINK>_ENABLED` | `1/true/on/yes` enables the sink |
//! | `LOGLIB_<SINK>_LOG_FORMAT` | `jsonl`, `csv`, `txt`, `xml`, `html` |
//! | `LOGLIB_<SINK>_TIMESTAMP_FORMAT` | `time_only`, `unix_timestamp`, ... |
//! | `LOGLIB_<SINK>_TRACE_FORMAT` | `none`, `basic`, `full` |
//! | `LOGLIB_<SINK>_APPEND_NEWLINE` | boolean |
//! | `LOGLIB_CONSOLE_{DISPLAY_NAME,DISPLAY_LEVEL,ANSI_FORMAT}` | console layout |
//! | `LOGLIB_DESCRIPTOR_PATH` | descriptor path |
//! | `LOGLIB_FILE_PATH` | log directory, with `%CWD%`, `%HOME%`, `%TMP%`, `%TEMP%` |
//! | `LOGLIB_FILE_DEFAULT_PERMISSIONS` | octal mode bits |
//! | `LOGLIB_HTTP_ENDPOINT` | POST target |
//! | `LOGLIB_{TCP,UDP}_{HOST,PORT}` | socket target |
//!
//! `<SINK>` is one of `CONSOLE`, `DESCRIPTOR`, `FILE`, `HTTP`, `TCP`, `UDP`;
//! the console sink has no log format.

use super::config::{
    AnsiFormat, Application, ConsoleConfiguration, DescriptorConfiguration, FileConfiguration,
    HttpConfiguration, SocketConfiguration,
};
use super::log_level::LogLevel;
use super::output_format::LogFormat;
use super::timestamp::TimestampFormat;
use super::trace_format::TraceFormat;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Frames skipped by default so the first frame is the logging call site
pub const DEFAULT_BACKTRACE_LEVEL: usize = 3;

static GLOBAL_DEFAULTS: OnceLock<Defaults> = OnceLock::new();

/// Apply the settings every formatting sink shares
macro_rules! apply_formats {
    ($lookup:ident, $sink:literal, $config:expr) => {{
        let config = $config;
        if let Some(value) = $lookup(concat!("LOGLIB_", $sink, "_ENABLED")) {
            config.enabled = parse_bool(&value);
        }
        if let Some(value) = $lookup(concat!("LOGLIB_", $sink, "_APPEND_NEWLINE")) {
            config.append_newline = parse_bool(&value);
        }
        if let Some(value) = $lookup(concat!("LOGLIB_", $sink, "_LOG_FORMAT")) {
            config.log_format = LogFormat::parse(&value);
        }
        if let Some(value) = $lookup(concat!("LOGLIB_", $sink, "_TIMESTAMP_FORMAT")) {
            config.timestamp_format = TimestampFormat::parse(&value);
        }
        if let Some(value) = $lookup(concat!("LOGLIB_", $sink, "_TRACE_FORMAT")) {
            config.trace_format = TraceFormat::parse(&value);
        }
    }};
}

/// Default configuration bundle copied into each new [`Application`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    pub min_level: LogLevel,
    pub backtrace_level: usize,
    pub console: ConsoleConfiguration,
    pub descriptor: DescriptorConfiguration,
    pub file: FileConfiguration,
    pub http: HttpConfiguration,
    pub tcp: SocketConfiguration,
    pub udp: SocketConfiguration,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            backtrace_level: DEFAULT_BACKTRACE_LEVEL,
            console: ConsoleConfiguration::default(),
            descriptor: DescriptorConfiguration::default(),
            file: FileConfiguration::default(),
            http: HttpConfiguration::default(),
            tcp: SocketConfiguration::default(),
            udp: SocketConfiguration::default(),
        }
    }
}

impl Defaults {
    /// Defaults seeded once per process from the environment
    pub fn global() -> &'static Defaults {
        GLOBAL_DEFAULTS.get_or_init(Defaults::from_env)
    }

    pub fn from_env() -> Self {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Built-in defaults overridden by whatever `lookup` returns
    pub fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut defaults = Defaults::default();

        if let Some(level) = lookup("LOG_LEVEL").filter(|value| !value.is_empty()) {
            defaults.min_level = LogLevel::parse(&level);
        }
        if let Some(depth) = lookup("LOGLIB_BACKTRACE_LEVEL").and_then(|v| v.trim().parse().ok()) {
            defaults.backtrace_level = depth;
        }

        let console = &mut defaults.console;
        if let Some(value) = lookup("LOGLIB_CONSOLE_ENABLED") {
            console.enabled = parse_bool(&value);
        }
        if let Some(value) = lookup("LOGLIB_CONSOLE_DISPLAY_NAME") {
            console.display_name = parse_bool(&value);
        }
        if let Some(value) = lookup("LOGLIB_CONSOLE_DISPLAY_LEVEL") {
            console.display_level = parse_bool(&value);
        }
        if let Some(value) = lookup("LOGLIB_CONSOLE_ANSI_FORMAT") {
            console.ansi_format = AnsiFormat::parse(&value);
        }
        if let Some(value) = lookup("LOGLIB_CONSOLE_TRACE_FORMAT") {
            console.trace_format = TraceFormat::parse(&value);
        }
        if let Some(value) = lookup("LOGLIB_CONSOLE_TIMESTAMP_FORMAT") {
            console.timestamp_format = TimestampFormat::parse(&value);
        }

        apply_formats!(lookup, "DESCRIPTOR", &mut defaults.descriptor);
        if let Some(path) = lookup("LOGLIB_DESCRIPTOR_PATH") {
            defaults.descriptor.path = PathBuf::from(path);
        }

        apply_formats!(lookup, "FILE", &mut defaults.file);
        if let Some(mode) = lookup("LOGLIB_FILE_DEFAULT_PERMISSIONS")
            .and_then(|value| u32::from_str_radix(value.trim(), 8).ok())
        {
            defaults.file.default_permissions = mode;
        }
        if let Some(path) = lookup("LOGLIB_FILE_PATH") {
            let path = expand_placeholders(&path);
            create_log_directory(&path, defaults.file.default_permissions);
            defaults.file.path = path;
        }

        apply_formats!(lookup, "HTTP", &mut defaults.http);
        if let Some(endpoint) = lookup("LOGLIB_HTTP_ENDPOINT") {
            defaults.http.endpoint = endpoint;
        }

        apply_formats!(lookup, "TCP", &mut defaults.tcp);
        apply_endpoint(&lookup, "TCP", &mut defaults.tcp);
        apply_formats!(lookup, "UDP", &mut defaults.udp);
        apply_endpoint(&lookup, "UDP", &mut defaults.udp);

        defaults
    }

    /// A fresh application carrying a copy of these defaults
    pub fn application(&self, name: impl Into<String>) -> Application {
        Application {
            name: name.into(),
            console: self.console.clone(),
            descriptor: self.descriptor.clone(),
            file: self.file.clone(),
            http: self.http.clone(),
            tcp: self.tcp.clone(),
            udp: self.udp.clone(),
        }
    }
}

fn apply_endpoint<F>(lookup: &F, sink: &str, config: &mut SocketConfiguration)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup(&format!("LOGLIB_{}_HOST", sink)) {
        config.host = host;
    }
    // Port 0 and out-of-range values keep the previous port.
    if let Some(port) = lookup(&format!("LOGLIB_{}_PORT", sink))
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|port| *port != 0)
    {
        config.port = port;
    }
}

/// `1`, `true`, `on` and `yes` are true; everything else is false
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

/// Replace `%CWD%`, `%HOME%`, `%TMP%` and `%TEMP%` (any case) in a path
pub fn expand_placeholders(path: &str) -> PathBuf {
    let temp = std::env::temp_dir().display().to_string();
    let cwd = std::env::current_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|_| ".".to_string());
    let home = dirs::home_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|| temp.clone());

    let mut expanded = path.to_string();
    for (placeholder, value) in [
        ("%CWD%", &cwd),
        ("%HOME%", &home),
        ("%TMP%", &temp),
        ("%TEMP%", &temp),
    ] {
        expanded = replace_ignore_case(&expanded, placeholder, value);
    }
    PathBuf::from(expanded)
}

fn replace_ignore_case(haystack: &str, needle: &str, replacement: &str) -> String {
    let lower = haystack.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();
    let mut output = String::with_capacity(haystack.len());
    let mut last = 0;
    for (start, _) in lower.match_indices(&needle) {
        output.push_str(&haystack[last..start]);
        output.push_str(replacement);
        last = start + needle.len();
    }
    output.push_str(&haystack[last..]);
    output
}

#[cfg(unix)]
fn create_log_directory(path: &std::path::Path, mode: u32) {
    use std::os::unix::fs::DirBuilderExt;
    if !path.is_dir() {
        let _ = std::fs::DirBuilder::new().recursive(true).mode(mode).create(path);
    }
}

#[cfg(not(unix))]
fn create_log_directory(path: &std::path::Path, _mode: u32) {
    if !path.is_dir() {
        let _ = std::fs::create_dir_all(path);
    }
}
