//! Appender implementations

pub mod json;

pub use json::JsonAppender;

pub use crate::core::Appender;
