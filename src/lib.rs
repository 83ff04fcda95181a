//! # GCP Logger System
//!
//! Structured logging that writes records in the JSON shape Google Cloud
//! Logging ingests from stdout, with errors reshaped into payloads Cloud
//! Error Reporting recognizes.
//!
//! ## Features
//!
//! - **Cloud Logging keys**: `severity`, `message`, `time` and
//!   `logging.googleapis.com/sourceLocation`
//! - **Error reports**: an `error` attribute turns the record into a
//!   `ReportedErrorEvent` with stack trace and `reportLocation`
//! - **Scoped loggers**: `with` / `with_group` derive loggers that share
//!   their parent's bindings without copying them
//! - **Rewrite hook**: one closure sees every attribute with its group path
//!
//! ## Example
//!
//! ```
//! use gcp_logger_system::prelude::*;
//!
//! let logger = Logger::builder()
//!     .min_level(LogLevel::Debug)
//!     .add_source(true)
//!     .appender(JsonAppender::new(Vec::new()))
//!     .build();
//!
//! let request = logger.with_group("request").with([Attr::new("id", "r-42")]);
//! request.info_with_attrs("handled", [Attr::new("status", 200)]);
//! request.error_with_attrs("failed", [Attr::err(TracedError::new("backend timeout"))]);
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::JsonAppender;
    pub use crate::core::{
        Appender, Attr, Document, Handler, HandlerOptions, LogBuilder, LogEntry, LogLevel,
        LogValuer, Logger, LoggerBuilder, LoggerError, LoggerMetrics, ReportLocation,
        ReportableError, Result, ScopeChain, Severity, SourceLocation, TracedError, Value,
    };
}

pub use crate::appenders::JsonAppender;
pub use crate::core::{
    compile, extract, replace_attr, Appender, Attr, Document, ErrorReport, Handler,
    HandlerOptions, HandlerOptionsBuilder, LogBuilder, LogEntry, LogLevel, LogValuer, Logger,
    LoggerBuilder, LoggerError, LoggerMetrics, ReplaceAttr, ReplaceAttrFn, ReportLocation,
    ReportableError, Result, ScopeChain, Severity, SourceLocation, TracedError, Value, ERROR_KEY,
    ERROR_REPORT_TYPE_KEY, ERROR_REPORT_TYPE_VALUE, LEVEL_KEY, MESSAGE_KEY, MSG_KEY,
    REPORT_LOCATION_KEY, SEVERITY_KEY, SOURCE_KEY, SOURCE_LOCATION_KEY, TIME_KEY,
};
