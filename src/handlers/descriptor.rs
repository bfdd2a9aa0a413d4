//! Descriptor handler: appends to an existing path such as a FIFO,
//! a character device or a file another process tails.

use super::render_message;
use crate::core::{Application, Event, Handler, HandlerKind, LoggerError, Result};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

type Writer = Box<dyn Write + Send>;
type Opener = Box<dyn Fn(&Path) -> Result<Writer> + Send>;

pub struct DescriptorHandler {
    /// Open append handle and the path it was opened for, per application name
    handles: HashMap<String, (PathBuf, Writer)>,
    opener: Opener,
}

impl DescriptorHandler {
    pub fn new() -> Self {
        Self::with_opener(|path: &Path| open(path).map(|file| Box::new(file) as Writer))
    }

    /// Open targets through `opener` instead of appending to the filesystem path
    pub fn with_opener<F>(opener: F) -> Self
    where
        F: Fn(&Path) -> Result<Writer> + Send + 'static,
    {
        Self {
            handles: HashMap::new(),
            opener: Box::new(opener),
        }
    }
}

impl Default for DescriptorHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn open(path: &Path) -> Result<File> {
    // The target must already exist; it is never created here.
    OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| LoggerError::io_operation("opening descriptor", path.display().to_string(), e))
}

fn write(writer: &mut Writer, message: &[u8]) -> std::io::Result<()> {
    writer.write_all(message)?;
    writer.flush()
}

impl Handler for DescriptorHandler {
    fn name(&self) -> &str {
        "descriptor"
    }

    fn kind(&self) -> HandlerKind {
        HandlerKind::Descriptor
    }

    fn is_available(&mut self, application: &Application) -> bool {
        let path = &application.descriptor.path;
        if !path.exists() {
            return false;
        }

        let cached = self
            .handles
            .get(application.name())
            .map(|(opened, _)| opened == path)
            .unwrap_or(false);
        if !cached {
            match (self.opener)(path.as_path()) {
                Ok(writer) => {
                    self.handles
                        .insert(application.name().to_string(), (path.clone(), writer));
                }
                Err(_) => {
                    self.handles.remove(application.name());
                }
            }
        }

        self.handles.contains_key(application.name())
    }

    fn deliver(&mut self, application: &Application, event: &Event) -> Result<()> {
        let config = &application.descriptor;
        let message = render_message(
            config.log_format,
            &config.timestamp_format,
            config.trace_format,
            config.append_newline,
            event,
        );

        let (path, writer) = self
            .handles
            .get_mut(application.name())
            .ok_or_else(|| LoggerError::unavailable("descriptor"))?;
        if write(writer, message.as_bytes()).is_ok() {
            return Ok(());
        }

        // Close, reopen and try once more
        let path = path.clone();
        self.handles.remove(application.name());
        let mut writer = (self.opener)(path.as_path())?;
        let retried = write(&mut writer, message.as_bytes());
        self.handles
            .insert(application.name().to_string(), (path.clone(), writer));
        retried.map_err(|e| {
            LoggerError::io_operation("writing descriptor", path.display().to_string(), e)
        })
    }
}
