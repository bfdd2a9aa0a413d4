//! Main logger implementation

use super::{
    capture::capture_backtrace,
    config::Application,
    defaults::Defaults,
    event::Event,
    exception::ExceptionDetails,
    handler::{Handler, HandlerKind},
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use crate::handlers::{self, ConsoleHandler};
use parking_lot::{Mutex, RwLock};
use std::io::Write;
use std::sync::Arc;

/// Synchronous dispatcher for one named application.
///
/// Each call builds an [`Event`] on the calling thread and offers it to every
/// handler in order. A handler that is disabled, unavailable, failing or
/// panicking is skipped without affecting the others.
pub struct Logger {
    application: RwLock<Application>,
    handlers: Mutex<Vec<Box<dyn Handler>>>,
    min_level: RwLock<LogLevel>,
    backtrace_level: usize,
    report_failures: bool,
    /// Metrics for observability (dispatched, delivered, failed, etc.)
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Logger using the process defaults and the built-in handlers
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        LoggerBuilder::new(name).build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_multisink_logger::prelude::*;
    ///
    /// let logger = Logger::builder("billing")
    ///     .min_level(LogLevel::Debug)
    ///     .backtrace_level(3)
    ///     .build();
    /// assert_eq!(logger.min_level(), LogLevel::Debug);
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }

    /// A copy of the current application configuration
    pub fn application(&self) -> Application {
        self.application.read().clone()
    }

    /// Change the application configuration in place
    pub fn configure<F>(&self, update: F)
    where
        F: FnOnce(&mut Application),
    {
        update(&mut *self.application.write());
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    #[inline(never)]
    pub fn debug(&self, message: impl Into<String>) {
        self.dispatch_new(LogLevel::Debug, message.into(), None);
    }

    #[inline(never)]
    pub fn verbose(&self, message: impl Into<String>) {
        self.dispatch_new(LogLevel::Verbose, message.into(), None);
    }

    #[inline(never)]
    pub fn info(&self, message: impl Into<String>) {
        self.dispatch_new(LogLevel::Info, message.into(), None);
    }

    #[inline(never)]
    pub fn warning(&self, message: impl Into<String>) {
        self.dispatch_new(LogLevel::Warning, message.into(), None);
    }

    #[inline(never)]
    pub fn error(&self, message: impl Into<String>) {
        self.dispatch_new(LogLevel::Error, message.into(), None);
    }

    #[inline(never)]
    pub fn critical(&self, message: impl Into<String>) {
        self.dispatch_new(LogLevel::Critical, message.into(), None);
    }

    /// Warning with an attached exception; accepts `&E` for any
    /// `std::error::Error` or a ready [`ExceptionDetails`]
    #[inline(never)]
    pub fn warning_with<X>(&self, message: impl Into<String>, exception: X)
    where
        X: Into<ExceptionDetails>,
    {
        self.dispatch_new(LogLevel::Warning, message.into(), Some(exception.into()));
    }

    #[inline(never)]
    pub fn error_with<X>(&self, message: impl Into<String>, exception: X)
    where
        X: Into<ExceptionDetails>,
    {
        self.dispatch_new(LogLevel::Error, message.into(), Some(exception.into()));
    }

    #[inline(never)]
    pub fn critical_with<X>(&self, message: impl Into<String>, exception: X)
    where
        X: Into<ExceptionDetails>,
    {
        self.dispatch_new(LogLevel::Critical, message.into(), Some(exception.into()));
    }

    #[inline(never)]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.dispatch_new(level, message.into(), None);
    }

    #[inline(never)]
    pub fn log_exception(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        exception: Option<ExceptionDetails>,
    ) {
        self.dispatch_new(level, message.into(), exception);
    }

    /// Build an event for the caller of one of the public logging methods.
    ///
    /// The backtrace depth counts this frame, the capture frame and the
    /// public method, so the default of 3 starts at the caller.
    #[inline(never)]
    fn dispatch_new(&self, level: LogLevel, message: String, exception: Option<ExceptionDetails>) {
        if !self.min_level().allows(level) {
            self.metrics.record_filtered();
            return;
        }

        let name = self.application.read().name.clone();
        let event = Event::new(name, level, message)
            .with_traces(capture_backtrace(self.backtrace_level))
            .with_exception(exception);
        self.dispatch(&event);
    }

    /// Offer a prebuilt event to the handlers, subject to the level filter
    pub fn dispatch(&self, event: &Event) {
        if !self.min_level().allows(event.level()) {
            self.metrics.record_filtered();
            return;
        }
        self.metrics.record_dispatched();

        let application = self.application.read();
        let mut handlers = self.handlers.lock();

        // Per-handler panic isolation: one broken sink never blocks the rest.
        for handler in handlers.iter_mut() {
            if !application.is_enabled(handler.kind()) {
                continue;
            }

            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                if !handler.is_available(&application) {
                    return Ok(false);
                }
                handler.deliver(&application, event).map(|()| true)
            }));

            match outcome {
                Ok(Ok(true)) => {
                    self.metrics.record_delivered();
                }
                Ok(Ok(false)) => {
                    self.metrics.record_unavailable();
                }
                Ok(Err(e)) => {
                    self.metrics.record_failed();
                    if self.report_failures {
                        eprintln!("[LOGGER ERROR] Handler '{}' failed: {}", handler.name(), e);
                    }
                }
                Err(panic_info) => {
                    self.metrics.record_failed();
                    if self.report_failures {
                        eprintln!(
                            "[LOGGER CRITICAL] Handler '{}' panicked: {}. \
                             Other handlers continue to function.",
                            handler.name(),
                            panic_message(panic_info.as_ref())
                        );
                    }
                }
            }
        }
    }

    /// Availability of every handler in dispatch order, ignoring enabled flags
    pub fn availability(&self) -> Vec<(HandlerKind, bool)> {
        let application = self.application.read();
        let mut handlers = self.handlers.lock();
        handlers
            .iter_mut()
            .map(|handler| {
                let available = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    handler.is_available(&application)
                }))
                .unwrap_or(false);
                (handler.kind(), available)
            })
            .collect()
    }

    /// Names of the installed handlers in dispatch order
    pub fn handler_names(&self) -> Vec<String> {
        self.handlers
            .lock()
            .iter()
            .map(|handler| handler.name().to_string())
            .collect()
    }
}

fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

type ConsoleWriters = (Box<dyn Write + Send>, Box<dyn Write + Send>);

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_multisink_logger::prelude::*;
///
/// let app = Application::new("api")
///     .with_all_disabled()
///     .with_console(ConsoleConfiguration::default().with_ansi_format(AnsiFormat::None));
///
/// let logger = Logger::builder("api")
///     .defaults(Defaults::default())
///     .application(app)
///     .report_failures(true)
///     .build();
///
/// logger.info("ready");
/// ```
pub struct LoggerBuilder {
    name: String,
    defaults: Option<Defaults>,
    application: Option<Application>,
    min_level: Option<LogLevel>,
    backtrace_level: Option<usize>,
    handlers: Option<Vec<Box<dyn Handler>>>,
    console_writers: Option<ConsoleWriters>,
    report_failures: bool,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            defaults: None,
            application: None,
            min_level: None,
            backtrace_level: None,
            handlers: None,
            console_writers: None,
            report_failures: false,
        }
    }

    /// Use these defaults instead of the process-wide ones
    #[must_use = "builder methods return a new value"]
    pub fn defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Use this configuration as-is; its name replaces the builder's
    #[must_use = "builder methods return a new value"]
    pub fn application(mut self, application: Application) -> Self {
        self.application = Some(application);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    /// Frames dropped from the front of each captured backtrace
    #[must_use = "builder methods return a new value"]
    pub fn backtrace_level(mut self, depth: usize) -> Self {
        self.backtrace_level = Some(depth);
        self
    }

    /// Add a handler; the first call replaces the built-in handler list
    #[must_use = "builder methods return a new value"]
    pub fn handler<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.handlers
            .get_or_insert_with(Vec::new)
            .push(Box::new(handler));
        self
    }

    /// Replace the built-in handler list
    #[must_use = "builder methods return a new value"]
    pub fn handlers(mut self, handlers: Vec<Box<dyn Handler>>) -> Self {
        self.handlers = Some(handlers);
        self
    }

    /// Send console output to these writers instead of stdout/stderr
    #[must_use = "builder methods return a new value"]
    pub fn console_writers<O, E>(mut self, out: O, err: E) -> Self
    where
        O: Write + Send + 'static,
        E: Write + Send + 'static,
    {
        self.console_writers = Some((Box::new(out), Box::new(err)));
        self
    }

    /// Report handler failures and panics on stderr
    #[must_use = "builder methods return a new value"]
    pub fn report_failures(mut self, enabled: bool) -> Self {
        self.report_failures = enabled;
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let defaults = self
            .defaults
            .unwrap_or_else(|| Defaults::global().clone());
        let application = self
            .application
            .unwrap_or_else(|| defaults.application(self.name));

        let handlers = match (self.handlers, self.console_writers) {
            (Some(handlers), _) => handlers,
            (None, Some((out, err))) => {
                let mut handlers = handlers::default_handlers();
                handlers[0] = Box::new(ConsoleHandler::with_writers(out, err));
                handlers
            }
            (None, None) => handlers::default_handlers(),
        };

        Logger {
            application: RwLock::new(application),
            handlers: Mutex::new(handlers),
            min_level: RwLock::new(self.min_level.unwrap_or(defaults.min_level)),
            backtrace_level: self.backtrace_level.unwrap_or(defaults.backtrace_level),
            report_failures: self.report_failures,
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }
}
