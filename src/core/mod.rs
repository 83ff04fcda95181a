//! Core logger types and traits

pub mod appender;
pub mod compiler;
pub mod error;
pub mod error_report;
pub(crate) mod fields;
pub mod handler;
pub mod location;
pub mod log_builder;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod scope;
pub mod severity;
pub mod value;

pub use appender::Appender;
pub use compiler::{compile, Document};
pub use error::{LoggerError, Result};
pub use error_report::{
    extract, ErrorReport, ReportableError, TracedError, ERROR_KEY, ERROR_REPORT_TYPE_KEY,
    ERROR_REPORT_TYPE_VALUE, REPORT_LOCATION_KEY,
};
pub use handler::{Handler, HandlerOptions, HandlerOptionsBuilder, ReplaceAttr, ReplaceAttrFn};
pub use location::{ReportLocation, SourceLocation};
pub use log_builder::LogBuilder;
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use scope::ScopeChain;
pub use severity::{
    replace_attr, Severity, LEVEL_KEY, MESSAGE_KEY, MSG_KEY, SEVERITY_KEY, SOURCE_KEY,
    SOURCE_LOCATION_KEY, TIME_KEY,
};
pub use value::{Attr, LogValuer, Value};
