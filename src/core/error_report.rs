//! Error Reporting support
//!
//! Cloud Error Reporting picks up log entries that carry the
//! `ReportedErrorEvent` type marker and a message holding either a stack
//! trace or, together with a `reportLocation`, a plain error text.
//! See <https://cloud.google.com/error-reporting/docs/formatting-error-messages>.

use super::location::{function_at, ReportLocation};
use super::value::Value;
use std::backtrace::Backtrace;
use std::error::Error as StdErrorTrait;
use std::fmt;

/// Key under which an error attribute turns a record into an error report.
pub const ERROR_KEY: &str = "error";

pub const ERROR_REPORT_TYPE_KEY: &str = "@type";
pub const ERROR_REPORT_TYPE_VALUE: &str =
    "type.googleapis.com/google.devtools.clouderrorreporting.v1beta1.ReportedErrorEvent";
pub const REPORT_LOCATION_KEY: &str = "reportLocation";

/// Error that can describe itself to Error Reporting.
///
/// Every capability is optional. The extractor consults them in a fixed
/// order: a stack trace wins over the error text, and a report location is
/// attached whenever one is available.
pub trait ReportableError: StdErrorTrait + Send + Sync + 'static {
    /// Stack trace text captured where the error was created.
    fn stack_trace(&self) -> Option<String> {
        None
    }

    /// Source location where the error was created.
    fn report_location(&self) -> Option<ReportLocation> {
        None
    }

    /// Structured form stored under the `error` key instead of the
    /// `Display` text.
    fn log_value(&self) -> Option<Value> {
        None
    }
}

/// Adapter giving a plain error the default (text only) capabilities.
pub(crate) struct StdError<E>(pub(crate) E);

impl<E: fmt::Debug> fmt::Debug for StdError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<E: fmt::Display> fmt::Display for StdError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<E: StdErrorTrait> StdErrorTrait for StdError<E> {
    fn source(&self) -> Option<&(dyn StdErrorTrait + 'static)> {
        self.0.source()
    }
}

impl<E: StdErrorTrait + Send + Sync + 'static> ReportableError for StdError<E> {}

/// Message and location derived from an error attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub message: String,
    pub location: Option<ReportLocation>,
}

/// Derive the error-report message and location from an `error` value.
///
/// Never fails: values that are neither errors nor strings produce a
/// diagnostic message and a location pointing at this function.
pub fn extract(value: &Value) -> ErrorReport {
    match value {
        Value::Error(error) => extract_error(error.as_ref()),
        Value::String(s) => ErrorReport {
            message: s.clone(),
            location: None,
        },
        other => ErrorReport {
            message: format!("!!! can't handle error report for type {} !!!", other.type_name()),
            location: Some(crate::report_location!()),
        },
    }
}

fn extract_error(error: &dyn ReportableError) -> ErrorReport {
    match (error.stack_trace(), error.report_location()) {
        (Some(stack), Some(location)) => ErrorReport {
            message: stack,
            location: Some(location),
        },
        (Some(stack), None) => ErrorReport {
            message: stack,
            location: None,
        },
        (None, Some(location)) => ErrorReport {
            message: error.to_string(),
            location: Some(location),
        },
        (None, None) => ErrorReport {
            message: error.to_string(),
            location: None,
        },
    }
}

/// Error that records a backtrace and its creation site.
///
/// Reported with its backtrace as the message and its creation site as
/// the report location.
///
/// # Example
///
/// ```
/// use gcp_logger_system::{ReportableError, TracedError};
///
/// let err = TracedError::new("connection reset");
/// assert_eq!(err.to_string(), "connection reset");
/// assert!(err.report_location().is_some());
/// ```
#[derive(Debug)]
pub struct TracedError {
    message: String,
    backtrace: Backtrace,
    location: ReportLocation,
    source: Option<Box<dyn StdErrorTrait + Send + Sync + 'static>>,
}

impl TracedError {
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::traced(message.into(), None, ReportLocation::caller())
    }

    /// Wrap an existing error, keeping it as the `source()`.
    #[track_caller]
    pub fn wrap<E>(source: E) -> Self
    where
        E: StdErrorTrait + Send + Sync + 'static,
    {
        Self::traced(source.to_string(), Some(Box::new(source)), ReportLocation::caller())
    }

    fn traced(
        message: String,
        source: Option<Box<dyn StdErrorTrait + Send + Sync + 'static>>,
        mut location: ReportLocation,
    ) -> Self {
        let backtrace = Backtrace::force_capture();
        if let Some(function) = function_at(&backtrace, &location.file_path, location.line_number) {
            location.function_name = function;
        }
        Self {
            message,
            backtrace,
            location,
            source,
        }
    }

    #[must_use]
    pub fn with_function(mut self, function_name: impl Into<String>) -> Self {
        self.location.function_name = function_name.into();
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: ReportLocation) -> Self {
        self.location = location;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for TracedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdErrorTrait for TracedError {
    fn source(&self) -> Option<&(dyn StdErrorTrait + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdErrorTrait + 'static))
    }
}

impl ReportableError for TracedError {
    fn stack_trace(&self) -> Option<String> {
        Some(format!("{}\n{}", self.message, self.backtrace))
    }

    fn report_location(&self) -> Option<ReportLocation> {
        Some(self.location.clone())
    }
}
