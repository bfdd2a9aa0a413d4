//! File handler implementation
//!
//! One file per application and day, `<path>/<name>-<YYYY-MM-DD>.<ext>`,
//! shared between processes through [`FileLock`].

use super::{file_lock::FileLock, render_message};
use crate::core::{
    output_format::CSV_HEADER, Application, Event, FileConfiguration, Handler, HandlerKind,
    LogFormat, LoggerError, Result,
};
use chrono::{Local, NaiveDate};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct FileHandler {
    locks: HashMap<String, FileLock>,
    intervals: Option<(Duration, Duration)>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self {
            locks: HashMap::new(),
            intervals: None,
        }
    }

    /// Override the lock retry and confirmation intervals of every lock this handler creates
    #[must_use]
    pub fn with_lock_intervals(mut self, retry: Duration, confirmation: Duration) -> Self {
        self.intervals = Some((retry, confirmation));
        self
    }

    /// Path of today's log file for `application`
    pub fn log_file_path(application: &Application) -> PathBuf {
        log_file_path_on(&application.file, application.name(), Local::now().date_naive())
    }

    fn new_lock(&self, path: &Path, config: &FileConfiguration) -> Result<FileLock> {
        let mut lock = FileLock::new(path, config.default_permissions)?;
        if let Some((retry, confirmation)) = self.intervals {
            lock = lock.with_intervals(retry, confirmation);
        }

        if config.log_format == LogFormat::Csv {
            lock.write_header(format!("{}\n", CSV_HEADER).as_bytes())?;
        }
        Ok(lock)
    }
}

impl Default for FileHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace characters that are unsafe in file names
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' => '-',
            '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '.' => '_',
            other => other,
        })
        .collect()
}

fn log_file_path_on(config: &FileConfiguration, name: &str, date: NaiveDate) -> PathBuf {
    config.path.join(format!(
        "{}-{}.{}",
        sanitize_file_name(name),
        date.format("%Y-%m-%d"),
        config.log_format.extension()
    ))
}

fn is_writable_dir(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
        Err(_) => false,
    }
}

impl Handler for FileHandler {
    fn name(&self) -> &str {
        "file"
    }

    fn kind(&self) -> HandlerKind {
        HandlerKind::File
    }

    fn is_available(&mut self, application: &Application) -> bool {
        if !is_writable_dir(&application.file.path) {
            return false;
        }

        let path = Self::log_file_path(application);
        let current = self
            .locks
            .get(application.name())
            .map(|lock| lock.path() == path.as_path())
            .unwrap_or(false);
        if current && path.exists() {
            return true;
        }

        match self.new_lock(&path, &application.file) {
            Ok(lock) => {
                self.locks.insert(application.name().to_string(), lock);
                true
            }
            Err(_) => {
                self.locks.remove(application.name());
                false
            }
        }
    }

    fn deliver(&mut self, application: &Application, event: &Event) -> Result<()> {
        let config = &application.file;
        let lock = self
            .locks
            .get(application.name())
            .ok_or_else(|| LoggerError::unavailable(self.name()))?;

        let message = render_message(
            config.log_format,
            &config.timestamp_format,
            config.trace_format,
            config.append_newline,
            event,
        );
        lock.append(message.as_bytes())
    }
}
