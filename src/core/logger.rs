//! Main logger implementation
//!
//! `Logger` is a thin facade over [`Handler`]: it captures the call-site,
//! builds the [`LogEntry`], and reports appender failures on stderr instead
//! of failing the caller.

use super::{
    appender::Appender,
    error::Result,
    handler::{Handler, HandlerOptions, HandlerOptionsBuilder},
    location::SourceLocation,
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    value::Attr,
};
use crate::appenders::JsonAppender;
use std::sync::Arc;

#[derive(Clone)]
pub struct Logger {
    handler: Handler,
    /// Shared by every logger derived from the same root
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Logger writing JSON lines to stdout with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[must_use]
    pub fn from_handler(handler: Handler) -> Self {
        Self {
            handler,
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use gcp_logger_system::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Debug)
    ///     .add_source(true)
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Derive a logger that adds `attrs` to every record.
    #[must_use]
    pub fn with<I>(&self, attrs: I) -> Self
    where
        I: IntoIterator<Item = Attr>,
    {
        Self {
            handler: self.handler.with_attrs(attrs),
            metrics: Arc::clone(&self.metrics),
        }
    }

    /// Derive a logger whose later attributes nest under `name`.
    #[must_use]
    pub fn with_group(&self, name: impl Into<String>) -> Self {
        Self {
            handler: self.handler.with_group(name),
            metrics: Arc::clone(&self.metrics),
        }
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.handler.enabled(level)
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.log_at(level, SourceLocation::caller(), message, Vec::new());
    }

    #[track_caller]
    pub fn log_with_attrs<I>(&self, level: LogLevel, message: impl Into<String>, attrs: I)
    where
        I: IntoIterator<Item = Attr>,
    {
        self.log_at(level, SourceLocation::caller(), message, attrs);
    }

    /// Log with an explicit call-site, as the macros do.
    pub fn log_at<I>(&self, level: LogLevel, source: SourceLocation, message: impl Into<String>, attrs: I)
    where
        I: IntoIterator<Item = Attr>,
    {
        if !self.enabled(level) {
            self.metrics.record_filtered();
            return;
        }

        let entry = LogEntry::new(level, message)
            .with_source(source)
            .with_attrs(attrs);
        self.log_entry(entry);
    }

    /// Hand a prepared entry to the handler.
    pub fn log_entry(&self, entry: LogEntry) {
        match self.handler.handle(entry) {
            Ok(Some(document)) => {
                self.metrics.record_logged();
                if document.is_error_report() {
                    self.metrics.record_error_report();
                }
            }
            Ok(None) => {
                self.metrics.record_filtered();
            }
            Err(e) => {
                let dropped = self.metrics.record_dropped();
                // first failure and every 1000th after that
                if dropped % 1000 == 0 {
                    eprintln!("[LOGGER ERROR] {} ({} records dropped)", e, dropped + 1);
                }
            }
        }
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(LogLevel::Fatal, message);
    }

    /// Helper for structured info logging
    #[track_caller]
    pub fn info_with_attrs<I>(&self, message: impl Into<String>, attrs: I)
    where
        I: IntoIterator<Item = Attr>,
    {
        self.log_with_attrs(LogLevel::Info, message, attrs);
    }

    /// Helper for structured warn logging
    #[track_caller]
    pub fn warn_with_attrs<I>(&self, message: impl Into<String>, attrs: I)
    where
        I: IntoIterator<Item = Attr>,
    {
        self.log_with_attrs(LogLevel::Warn, message, attrs);
    }

    /// Helper for structured error logging
    #[track_caller]
    pub fn error_with_attrs<I>(&self, message: impl Into<String>, attrs: I)
    where
        I: IntoIterator<Item = Attr>,
    {
        self.log_with_attrs(LogLevel::Error, message, attrs);
    }

    /// Get the logger metrics
    ///
    /// # Example
    ///
    /// ```
    /// use gcp_logger_system::prelude::*;
    ///
    /// let logger = Logger::builder().appender(JsonAppender::new(Vec::new())).build();
    /// logger.debug("filtered");
    /// assert_eq!(logger.metrics().filtered_count(), 1);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn dropped_count(&self) -> u64 {
        self.metrics.dropped_count()
    }

    pub fn flush(&self) -> Result<()> {
        self.handler.flush()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use gcp_logger_system::prelude::*;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .appender(JsonAppender::stderr())
///     .replace_attr(|_groups: &[String], attr: Attr| attr)
///     .build();
/// ```
pub struct LoggerBuilder {
    options: HandlerOptionsBuilder,
    appender: Option<Arc<dyn Appender>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            options: HandlerOptions::builder(),
            appender: None,
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.options = self.options.min_level(level);
        self
    }

    /// Emit the call-site as `logging.googleapis.com/sourceLocation`
    #[must_use = "builder methods return a new value"]
    pub fn add_source(mut self, enabled: bool) -> Self {
        self.options = self.options.add_source(enabled);
        self
    }

    /// Install an attribute rewrite hook
    #[must_use = "builder methods return a new value"]
    pub fn replace_attr<F>(mut self, replace: F) -> Self
    where
        F: Fn(&[String], Attr) -> Attr + Send + Sync + 'static,
    {
        self.options = self.options.replace_attr(replace);
        self
    }

    /// Set the appender; defaults to JSON lines on stdout
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appender = Some(Arc::new(appender));
        self
    }

    /// Set an appender that is also held elsewhere
    #[must_use = "builder methods return a new value"]
    pub fn shared_appender(mut self, appender: Arc<dyn Appender>) -> Self {
        self.appender = Some(appender);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let appender = self
            .appender
            .unwrap_or_else(|| Arc::new(JsonAppender::stdout()));
        Logger::from_handler(Handler::new(appender, self.options.build()))
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
