//! Attribute model for structured records
//!
//! This module provides:
//! - `Attr`: a key/value pair attached to a record or bound on a scope
//! - `Value`: the closed set of value shapes an attribute can carry
//! - `LogValuer`: types that expand themselves into a `Value` when logged

use super::error_report::{ReportableError, StdError, TracedError, ERROR_KEY};
use super::fields::AttrWriter;
use super::location::SourceLocation;
use super::log_level::LogLevel;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Upper bound on chained `LogValuer` expansions before giving up.
const MAX_VALUER_DEPTH: usize = 100;

/// A type that produces its own structured representation when logged.
///
/// # Example
///
/// ```
/// use gcp_logger_system::{Attr, LogValuer, Value};
///
/// struct User {
///     id: u64,
///     name: String,
/// }
///
/// impl LogValuer for User {
///     fn log_value(&self) -> Value {
///         Value::group([Attr::new("id", self.id), Attr::new("name", self.name.as_str())])
///     }
/// }
/// ```
pub trait LogValuer: Send + Sync {
    fn log_value(&self) -> Value;

    /// Rust type name, used in diagnostics.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Value carried by an [`Attr`].
#[derive(Clone)]
pub enum Value {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Time(DateTime<Utc>),
    Level(LogLevel),
    Source(SourceLocation),
    Group(Vec<Attr>),
    Valuer(Arc<dyn LogValuer>),
    Error(Arc<dyn ReportableError>),
    /// Any other serializable object, already in its JSON form.
    Any {
        type_name: &'static str,
        json: serde_json::Value,
    },
}

impl Value {
    pub fn group<I>(attrs: I) -> Self
    where
        I: IntoIterator<Item = Attr>,
    {
        Value::Group(attrs.into_iter().collect())
    }

    pub fn valuer<V: LogValuer + 'static>(valuer: V) -> Self {
        Value::Valuer(Arc::new(valuer))
    }

    /// Wrap an error that may expose a stack trace, a report location or a
    /// structured form.
    pub fn error<E: ReportableError>(error: E) -> Self {
        Value::Error(Arc::new(error))
    }

    /// Wrap a plain `std::error::Error`; only its `Display` text is reported.
    pub fn std_error<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Value::Error(Arc::new(StdError(error)))
    }

    /// Serialize an arbitrary object into its generic JSON representation.
    pub fn any<T: Serialize + ?Sized>(value: &T) -> Self {
        let json = serde_json::to_value(value)
            .unwrap_or_else(|e| serde_json::Value::String(format!("!ERROR: {}", e)));
        Value::Any {
            type_name: std::any::type_name::<T>(),
            json,
        }
    }

    /// Expand `LogValuer`s until a concrete value is reached.
    pub fn resolve(self) -> Value {
        let mut value = self;
        for _ in 0..MAX_VALUER_DEPTH {
            match value {
                Value::Valuer(valuer) => value = valuer.log_value(),
                resolved => return resolved,
            }
        }
        match value {
            Value::Valuer(valuer) => Value::String(format!(
                "!ERROR: LogValuer {} expanded more than {} times",
                valuer.type_name(),
                MAX_VALUER_DEPTH
            )),
            resolved => resolved,
        }
    }

    /// Rust-side name of the carried type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "String",
            Value::Int(_) => "i64",
            Value::Uint(_) => "u64",
            Value::Float(_) => "f64",
            Value::Bool(_) => "bool",
            Value::Time(_) => "DateTime<Utc>",
            Value::Level(_) => "LogLevel",
            Value::Source(_) => "SourceLocation",
            Value::Group(_) => "Vec<Attr>",
            Value::Valuer(valuer) => valuer.type_name(),
            Value::Error(_) => "dyn ReportableError",
            Value::Any { type_name, .. } => type_name,
        }
    }

    /// JSON representation used in the output document.
    ///
    /// Errors render as their structured form when they have one and as
    /// their `Display` text otherwise.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Uint(u) => serde_json::Value::Number((*u).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Time(t) => {
                serde_json::Value::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::Level(level) => serde_json::Value::String(level.to_str().to_string()),
            Value::Source(source) => serde_json::to_value(source)
                .unwrap_or_else(|e| serde_json::Value::String(format!("!ERROR: {}", e))),
            Value::Group(attrs) => serde_json::Value::Object(AttrWriter::plain().group_to_json(attrs)),
            Value::Valuer(valuer) => valuer.log_value().resolve().to_json(),
            Value::Error(error) => match error.log_value() {
                Some(value) => value.resolve().to_json(),
                None => serde_json::Value::String(error.to_string()),
            },
            Value::Any { json, .. } => json.clone(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::Uint(u) => f.debug_tuple("Uint").field(u).finish(),
            Value::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Time(t) => f.debug_tuple("Time").field(t).finish(),
            Value::Level(level) => f.debug_tuple("Level").field(level).finish(),
            Value::Source(source) => f.debug_tuple("Source").field(source).finish(),
            Value::Group(attrs) => f.debug_tuple("Group").field(attrs).finish(),
            Value::Valuer(valuer) => f.debug_tuple("Valuer").field(&valuer.type_name()).finish(),
            Value::Error(error) => f.debug_tuple("Error").field(&error.to_string()).finish(),
            Value::Any { type_name, json } => f
                .debug_struct("Any")
                .field("type_name", type_name)
                .field("json", json)
                .finish(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Level(a), Value::Level(b)) => a == b,
            (Value::Source(a), Value::Source(b)) => a == b,
            (Value::Group(a), Value::Group(b)) => a == b,
            (Value::Valuer(a), Value::Valuer(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (Value::Error(a), Value::Error(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            (Value::Any { json: a, .. }, Value::Any { json: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint(u)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::Uint(u as u64)
    }
}

impl From<usize> for Value {
    fn from(u: usize) -> Self {
        Value::Uint(u as u64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Time(t)
    }
}

impl From<LogLevel> for Value {
    fn from(level: LogLevel) -> Self {
        Value::Level(level)
    }
}

impl From<TracedError> for Value {
    fn from(error: TracedError) -> Self {
        Value::error(error)
    }
}

impl From<SourceLocation> for Value {
    fn from(source: SourceLocation) -> Self {
        Value::Source(source)
    }
}

/// Key/value pair attached to a record or bound on a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Named group of attributes; an empty key inlines them into the
    /// enclosing level.
    pub fn group<K, I>(key: K, attrs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = Attr>,
    {
        Self::new(key, Value::group(attrs))
    }

    pub fn valuer<K: Into<String>, V: LogValuer + 'static>(key: K, valuer: V) -> Self {
        Self::new(key, Value::valuer(valuer))
    }

    pub fn any<K: Into<String>, T: Serialize + ?Sized>(key: K, value: &T) -> Self {
        Self::new(key, Value::any(value))
    }

    /// Attribute under the well-known `error` key.
    pub fn err<E: ReportableError>(error: E) -> Self {
        Self::new(ERROR_KEY, Value::error(error))
    }

    /// Attribute under the well-known `error` key for a plain error.
    pub fn std_err<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::new(ERROR_KEY, Value::std_error(error))
    }
}
