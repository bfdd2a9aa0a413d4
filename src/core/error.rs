//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A canonical record could not be turned back into an event
    #[error("Malformed {record} record: {message}")]
    MalformedRecord { record: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File lock error
    #[error("Failed to acquire file lock on '{path}'")]
    FileLockError { path: String },

    /// A handler was asked to deliver without a usable resource
    #[error("Handler '{handler}' is not available")]
    HandlerUnavailable { handler: String },

    /// Transport failure that survived the retry
    #[error("Transport error in {handler}: {message}")]
    Transport { handler: String, message: String },

    /// Rendered message exceeds the transport limit
    #[error("Message of {size} bytes exceeds the {max} byte limit")]
    MessageTooLarge { size: usize, max: usize },

    /// HTTP client error
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a malformed record error
    pub fn malformed(record: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::MalformedRecord {
            record: record.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file lock error
    pub fn file_lock(path: impl Into<String>) -> Self {
        LoggerError::FileLockError { path: path.into() }
    }

    pub fn unavailable(handler: impl Into<String>) -> Self {
        LoggerError::HandlerUnavailable {
            handler: handler.into(),
        }
    }

    pub fn transport(handler: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Transport {
            handler: handler.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// Whether this error came from decoding a persisted or received record
    pub fn is_malformed_record(&self) -> bool {
        matches!(self, LoggerError::MalformedRecord { .. })
    }
}
