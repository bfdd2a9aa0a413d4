//! Cooperative advisory locking for shared log files
//!
//! Several processes may append to the same daily log file. Each append opens
//! the file, takes an exclusive `flock`-style lock, waits a short confirmation
//! interval and re-checks the lock without blocking before writing. A failed
//! re-check releases the lock and starts over.

use crate::core::{LoggerError, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_CONFIRMATION_INTERVAL: Duration = Duration::from_millis(50);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Appends whole records to one file under an exclusive lock
#[derive(Debug, Clone)]
pub struct FileLock {
    path: PathBuf,
    permissions: u32,
    retry_interval: Duration,
    confirmation_interval: Duration,
    max_attempts: u32,
}

impl FileLock {
    /// Prepare a lock for `path`, creating the file with `permissions` if missing
    pub fn new(path: impl Into<PathBuf>, permissions: u32) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    LoggerError::io_operation("creating log file", path.display().to_string(), e)
                })?;
            set_permissions(&path, permissions).map_err(|e| {
                LoggerError::io_operation("setting permissions", path.display().to_string(), e)
            })?;
        }

        Ok(Self {
            path,
            permissions,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            confirmation_interval: DEFAULT_CONFIRMATION_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    #[must_use]
    pub fn with_intervals(mut self, retry: Duration, confirmation: Duration) -> Self {
        self.retry_interval = retry;
        self.confirmation_interval = confirmation;
        self
    }

    /// Cap on acquisition rounds before giving up with [`LoggerError::FileLockError`]
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `data` as one contiguous write while holding the lock
    pub fn append(&self, data: &[u8]) -> Result<()> {
        self.with_locked("appending", |file| file.write_all(data))
    }

    /// Write `header` if the file is still empty once the lock is held
    pub fn write_header(&self, header: &[u8]) -> Result<()> {
        self.with_locked("writing header", |file| {
            if file.metadata()?.len() == 0 {
                file.write_all(header)
            } else {
                Ok(())
            }
        })
    }

    fn with_locked<F>(&self, action: &str, write: F) -> Result<()>
    where
        F: FnOnce(&mut File) -> std::io::Result<()>,
    {
        let mut file = self.lock()?;
        let written = write(&mut file).and_then(|()| file.flush());
        self.unlock(file);
        written.map_err(|e| LoggerError::io_operation(action, self.path.display().to_string(), e))
    }

    fn lock(&self) -> Result<File> {
        for _ in 0..self.max_attempts {
            let file = match OpenOptions::new().create(true).append(true).open(&self.path) {
                Ok(file) => file,
                Err(e) => {
                    return Err(LoggerError::io_operation(
                        "opening log file",
                        self.path.display().to_string(),
                        e,
                    ))
                }
            };

            if file.lock_exclusive().is_err() {
                thread::sleep(self.retry_interval);
                continue;
            }

            thread::sleep(self.confirmation_interval);
            if confirm(&file) {
                return Ok(file);
            }

            let _ = file.unlock();
            thread::sleep(self.retry_interval);
        }

        Err(LoggerError::file_lock(self.path.display().to_string()))
    }

    fn unlock(&self, file: File) {
        let _ = file.unlock();
        drop(file);

        // Restore the configured mode if someone took write access away.
        let writable = std::fs::metadata(&self.path)
            .map(|meta| !meta.permissions().readonly())
            .unwrap_or(true);
        if !writable {
            let _ = set_permissions(&self.path, self.permissions);
        }
    }
}

/// Non-blocking re-acquisition of a lock this handle already holds
#[cfg(unix)]
fn confirm(file: &File) -> bool {
    file.try_lock_exclusive().is_ok()
}

// Windows byte-range locks are not re-entrant; a second request from the same
// handle would always fail.
#[cfg(not(unix))]
fn confirm(_file: &File) -> bool {
    true
}

#[cfg(unix)]
fn set_permissions(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_permissions(path: &Path, mode: u32) -> std::io::Result<()> {
    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_readonly(mode & 0o222 == 0);
    std::fs::set_permissions(path, permissions)
}
