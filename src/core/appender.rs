//! Appender trait for log output destinations

use super::{compiler::Document, error::Result};

/// Encoder + sink for compiled documents.
///
/// Appenders are shared between every handler derived from the same root,
/// so `append` takes `&self`; implementations must write each document as
/// one unit so concurrent records never interleave.
pub trait Appender: Send + Sync {
    fn append(&self, document: &Document) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}
