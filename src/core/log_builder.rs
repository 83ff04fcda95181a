//! Structured log builder for fluent record construction

use super::error_report::ReportableError;
use super::location::SourceLocation;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::logger::Logger;
use super::value::{Attr, Value};

/// Builder for one structured record
///
/// The call-site is captured when the builder is created.
///
/// # Example
///
/// ```
/// use gcp_logger_system::prelude::*;
///
/// let logger = Logger::builder().appender(JsonAppender::new(Vec::new())).build();
///
/// logger.error_builder()
///     .message("Database connection failed")
///     .attr("retry_count", 3)
///     .group("db", [Attr::new("host", "10.0.0.5"), Attr::new("port", 5432)])
///     .std_err(std::io::Error::new(std::io::ErrorKind::TimedOut, "connect timeout"))
///     .log();
/// ```
pub struct LogBuilder<'a> {
    logger: &'a Logger,
    level: LogLevel,
    message: String,
    attrs: Vec<Attr>,
    source: SourceLocation,
}

impl<'a> LogBuilder<'a> {
    #[track_caller]
    pub fn new(logger: &'a Logger, level: LogLevel) -> Self {
        let mut source = SourceLocation::caller();
        // the call-site frame may have moved on by the time `log` runs
        if logger.handler().options().add_source && logger.enabled(level) {
            source.resolve_function();
        }
        Self {
            logger,
            level,
            message: String::new(),
            attrs: Vec::new(),
            source,
        }
    }

    #[must_use]
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.message = msg.into();
        self
    }

    #[must_use]
    pub fn attr<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.attrs.push(Attr::new(key, value));
        self
    }

    #[must_use]
    pub fn attrs<I>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = Attr>,
    {
        self.attrs.extend(attrs);
        self
    }

    #[must_use]
    pub fn group<K, I>(mut self, key: K, attrs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = Attr>,
    {
        self.attrs.push(Attr::group(key, attrs));
        self
    }

    /// Attach an error under the `error` key.
    #[must_use]
    pub fn err<E: ReportableError>(mut self, error: E) -> Self {
        self.attrs.push(Attr::err(error));
        self
    }

    /// Attach a plain error under the `error` key.
    #[must_use]
    pub fn std_err<E>(mut self, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.attrs.push(Attr::std_err(error));
        self
    }

    /// Override the captured call-site
    #[must_use]
    pub fn location(mut self, source: SourceLocation) -> Self {
        self.source = source;
        self
    }

    /// Build and send the record
    pub fn log(self) {
        if !self.logger.enabled(self.level) {
            self.logger.metrics().record_filtered();
            return;
        }
        let entry = LogEntry::new(self.level, self.message)
            .with_source(self.source)
            .with_attrs(self.attrs);
        self.logger.log_entry(entry);
    }
}

impl Logger {
    #[track_caller]
    pub fn debug_builder(&self) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Debug)
    }

    #[track_caller]
    pub fn info_builder(&self) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Info)
    }

    #[track_caller]
    pub fn warn_builder(&self) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Warn)
    }

    #[track_caller]
    pub fn error_builder(&self) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::JsonAppender;
    use crate::core::error_report::TracedError;
    use std::sync::Arc;

    fn logger_with_buffer() -> (Logger, Arc<JsonAppender<Vec<u8>>>) {
        let appender = Arc::new(JsonAppender::new(Vec::new()));
        let logger = Logger::builder()
            .min_level(LogLevel::Debug)
            .add_source(true)
            .shared_appender(appender.clone())
            .build();
        (logger, appender)
    }

    fn written(appender: &JsonAppender<Vec<u8>>) -> Vec<serde_json::Value> {
        appender.with_writer(|buf| {
            String::from_utf8_lossy(buf)
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        })
    }

    #[test]
    fn test_builder_writes_fields_and_groups() {
        let (logger, appender) = logger_with_buffer();

        logger
            .info_builder()
            .message("Request processed")
            .attr("latency_ms", 42.5)
            .group("http", [Attr::new("status", 200)])
            .log();

        let docs = written(&appender);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["message"], "Request processed");
        assert_eq!(docs[0]["latency_ms"], 42.5);
        assert_eq!(docs[0]["http"]["status"], 200);
        assert!(docs[0]["logging.googleapis.com/sourceLocation"]["file"]
            .as_str()
            .unwrap()
            .ends_with("log_builder.rs"));
    }

    #[test]
    fn test_builder_error_report() {
        let (logger, appender) = logger_with_buffer();

        logger
            .error_builder()
            .message("save failed")
            .err(TracedError::new("disk full"))
            .log();

        assert_eq!(logger.metrics().error_reports(), 1);
        let docs = written(&appender);
        assert!(docs[0]["message"].as_str().unwrap().starts_with("disk full\n"));
        assert_eq!(docs[0]["error"], "disk full");
        assert!(docs[0]["reportLocation"]["filePath"]
            .as_str()
            .unwrap()
            .ends_with("log_builder.rs"));
    }

    #[test]
    fn test_builder_names_calling_function() {
        let (logger, appender) = logger_with_buffer();

        let builder = logger.info_builder();
        builder.message("named").log();

        let docs = written(&appender);
        let function = docs[0]["logging.googleapis.com/sourceLocation"]["function"]
            .as_str()
            .unwrap();
        assert!(function.ends_with("test_builder_names_calling_function"), "{function}");
    }

    #[test]
    fn test_builder_respects_level() {
        let logger = Logger::builder()
            .appender(JsonAppender::new(Vec::new()))
            .build();

        logger.debug_builder().message("hidden").log();
        assert_eq!(logger.metrics().filtered_count(), 1);
        assert_eq!(logger.metrics().total_logged(), 0);
    }
}
