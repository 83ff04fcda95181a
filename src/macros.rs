//! Logging macros for ergonomic log message formatting.
//!
//! Unlike the plain `Logger` methods, the macros also capture the name of
//! the enclosing function, so `logging.googleapis.com/sourceLocation`
//! carries `function` alongside `file` and `line`.
//!
//! # Examples
//!
//! ```
//! use gcp_logger_system::prelude::*;
//! use gcp_logger_system::info;
//!
//! let logger = Logger::builder().appender(JsonAppender::new(Vec::new())).build();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With attributes after a `;`
//! info!(logger, "User logged in"; "user_id" => 42, "action" => "login");
//! ```

/// Fully qualified name of the enclosing function.
///
/// ```
/// fn handler() -> &'static str {
///     gcp_logger_system::function_name!()
/// }
/// assert!(handler().ends_with("handler"));
/// ```
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

/// [`SourceLocation`](crate::SourceLocation) of the macro call-site.
#[macro_export]
macro_rules! source_location {
    () => {
        $crate::SourceLocation::new($crate::function_name!(), file!(), line!())
    };
}

/// [`ReportLocation`](crate::ReportLocation) of the macro call-site.
#[macro_export]
macro_rules! report_location {
    () => {
        $crate::ReportLocation::new(file!(), line!(), $crate::function_name!())
    };
}

/// Create a [`TracedError`](crate::TracedError) with a formatted message,
/// capturing the call-site and enclosing function as its report location.
///
/// ```
/// use gcp_logger_system::{traced_error, ReportableError};
///
/// let err = traced_error!("quota exceeded for {}", "project-1");
/// assert_eq!(err.to_string(), "quota exceeded for project-1");
/// assert!(err.report_location().is_some());
/// ```
#[macro_export]
macro_rules! traced_error {
    ($($arg:tt)+) => {
        $crate::TracedError::new(format!($($arg)+))
            .with_location($crate::report_location!())
    };
}

/// Log a message with automatic formatting.
///
/// Attributes follow the format arguments after a `;` as `key => value`
/// pairs; values go through `Into<Value>`.
///
/// # Examples
///
/// ```
/// # use gcp_logger_system::prelude::*;
/// # let logger = Logger::builder().appender(JsonAppender::new(Vec::new())).build();
/// use gcp_logger_system::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// log!(logger, LogLevel::Warn, "Slow request"; "latency_ms" => 1250.0, "path" => "/api");
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* ; $($key:expr => $value:expr),+ $(,)?) => {
        $logger.log_at(
            $level,
            $crate::source_location!(),
            format!($fmt $(, $arg)*),
            vec![$($crate::Attr::new($key, $value)),+],
        )
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_at(
            $level,
            $crate::source_location!(),
            format!($($arg)+),
            ::std::vec::Vec::new(),
        )
    };
}

/// Log a trace-level message.
///
/// Trace records are written with severity `DEFAULT`.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use gcp_logger_system::prelude::*;
/// # let logger = Logger::builder().appender(JsonAppender::new(Vec::new())).build();
/// use gcp_logger_system::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use gcp_logger_system::prelude::*;
/// # let logger = Logger::builder().appender(JsonAppender::new(Vec::new())).build();
/// use gcp_logger_system::{error, traced_error};
/// error!(logger, "Upload failed"; "error" => traced_error!("bucket {} not found", "logs"));
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// Fatal records are written with severity `DEFAULT`; the macro does not
/// abort the process.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::appenders::JsonAppender;
    use crate::core::{LogLevel, Logger, ReportableError};
    use std::sync::Arc;

    fn buffered(min_level: LogLevel) -> (Logger, Arc<JsonAppender<Vec<u8>>>) {
        let appender = Arc::new(JsonAppender::new(Vec::new()));
        let logger = Logger::builder()
            .min_level(min_level)
            .add_source(true)
            .shared_appender(appender.clone())
            .build();
        (logger, appender)
    }

    fn lines(appender: &JsonAppender<Vec<u8>>) -> Vec<serde_json::Value> {
        appender.with_writer(|buf| {
            String::from_utf8_lossy(buf)
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        })
    }

    #[test]
    fn test_function_name() {
        let name = function_name!();
        assert!(name.ends_with("macros::tests::test_function_name"), "{}", name);
    }

    #[test]
    fn test_log_macro() {
        let (logger, appender) = buffered(LogLevel::Info);
        log!(logger, LogLevel::Info, "Test message");
        log!(logger, LogLevel::Info, "Formatted: {}", 42);

        let docs = lines(&appender);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1]["message"], "Formatted: 42");
    }

    #[test]
    fn test_macro_source_has_function() {
        let (logger, appender) = buffered(LogLevel::Info);
        info!(logger, "Items: {}", 100);

        let docs = lines(&appender);
        let source = &docs[0]["logging.googleapis.com/sourceLocation"];
        assert!(source["function"]
            .as_str()
            .unwrap()
            .ends_with("test_macro_source_has_function"));
        assert!(source["file"].as_str().unwrap().ends_with("macros.rs"));
    }

    #[test]
    fn test_macro_attrs() {
        let (logger, appender) = buffered(LogLevel::Info);
        let attempt = 1;
        warn!(logger, "Retry {} of {}", attempt, 3; "backoff_ms" => 250, "op" => "upload",);

        let docs = lines(&appender);
        assert_eq!(docs[0]["message"], "Retry 1 of 3");
        assert_eq!(docs[0]["severity"], "WARNING");
        assert_eq!(docs[0]["backoff_ms"], 250);
        assert_eq!(docs[0]["op"], "upload");
    }

    #[test]
    fn test_level_macros_gate() {
        let (logger, appender) = buffered(LogLevel::Info);
        trace!(logger, "Trace message");
        debug!(logger, "Count: {}", 5);
        error!(logger, "Code: {}", 500);
        fatal!(logger, "Critical failure: {}", "system");

        let docs = lines(&appender);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["severity"], "ERROR");
        assert_eq!(docs[1]["severity"], "DEFAULT");
        assert_eq!(logger.metrics().filtered_count(), 2);
    }

    #[test]
    fn test_traced_error_macro() {
        let err = traced_error!("bad {}", "input");
        let location = err.report_location().unwrap();
        assert_eq!(err.to_string(), "bad input");
        assert!(location.file_path.ends_with("macros.rs"));
        assert!(location.function_name.ends_with("test_traced_error_macro"));
    }
}
