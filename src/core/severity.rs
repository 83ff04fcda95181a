//! Cloud Logging severities and default-key translation
//!
//! See <https://cloud.google.com/logging/docs/structured-logging> for the
//! special fields recognized by the logging agent.

use super::log_level::LogLevel;
use super::value::{Attr, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

// Default keys of a record, before translation.
pub const TIME_KEY: &str = "time";
pub const LEVEL_KEY: &str = "level";
pub const MSG_KEY: &str = "msg";
pub const SOURCE_KEY: &str = "source";

// Cloud Logging keys.
pub const SEVERITY_KEY: &str = "severity";
pub const MESSAGE_KEY: &str = "message";
pub const SOURCE_LOCATION_KEY: &str = "logging.googleapis.com/sourceLocation";

/// Cloud Logging severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Default,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Default => "DEFAULT",
        }
    }
}

impl From<LogLevel> for Severity {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Severity::Debug,
            LogLevel::Info => Severity::Info,
            LogLevel::Warn => Severity::Warning,
            LogLevel::Error => Severity::Error,
            LogLevel::Trace | LogLevel::Fatal => Severity::Default,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translate a default record attribute into its Cloud Logging form.
///
/// Only top-level attributes are touched; anything inside a group is
/// returned unchanged. The signature matches the rewrite hook, so this can
/// also be installed as one.
///
/// | key      | result                                              |
/// |----------|-----------------------------------------------------|
/// | `time`   | unchanged                                           |
/// | `level`  | `severity`, value mapped through [`Severity`]       |
/// | `msg`    | `message`                                           |
/// | `source` | `logging.googleapis.com/sourceLocation`             |
pub fn replace_attr(groups: &[String], attr: Attr) -> Attr {
    if !groups.is_empty() {
        return attr;
    }
    match attr.key.as_str() {
        LEVEL_KEY => replace_level_attr(attr),
        MSG_KEY => Attr::new(MESSAGE_KEY, attr.value),
        SOURCE_KEY => Attr::new(SOURCE_LOCATION_KEY, attr.value),
        _ => attr,
    }
}

fn replace_level_attr(attr: Attr) -> Attr {
    let severity = match attr.value {
        Value::Level(level) => Severity::from(level),
        _ => Severity::Default,
    };
    Attr::new(SEVERITY_KEY, severity.as_str())
}
