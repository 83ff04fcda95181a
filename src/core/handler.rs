//! Handler: configuration, scope, and sink wired together
//!
//! A `Handler` is the handler-side contract a logging facade drives:
//! `enabled` for the cheap level check, `handle` to compile and emit a
//! record, and `with_attrs` / `with_group` to derive scoped handlers.

use super::appender::Appender;
use super::compiler::{self, Document};
use super::error::Result;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::scope::ScopeChain;
use super::value::Attr;
use std::fmt;
use std::sync::Arc;

/// Rewrite hook signature: `(group path, attribute) -> attribute`.
///
/// Returning an attribute with an empty key drops it.
pub type ReplaceAttr = dyn Fn(&[String], Attr) -> Attr + Send + Sync;

/// Shared rewrite hook
pub type ReplaceAttrFn = Arc<ReplaceAttr>;

/// Options controlling how records are compiled.
#[derive(Clone, Default)]
pub struct HandlerOptions {
    /// Records below this level are skipped. Defaults to `Info`.
    pub min_level: LogLevel,

    /// Emit `logging.googleapis.com/sourceLocation` from the call-site.
    pub add_source: bool,

    /// Optional hook run on every attribute before grouping.
    pub replace_attr: Option<ReplaceAttrFn>,
}

impl HandlerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> HandlerOptionsBuilder {
        HandlerOptionsBuilder::new()
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

impl fmt::Debug for HandlerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerOptions")
            .field("min_level", &self.min_level)
            .field("add_source", &self.add_source)
            .field("replace_attr", &self.replace_attr.is_some())
            .finish()
    }
}

/// Builder for [`HandlerOptions`]
///
/// # Example
/// ```
/// use gcp_logger_system::prelude::*;
///
/// let options = HandlerOptions::builder()
///     .min_level(LogLevel::Debug)
///     .add_source(true)
///     .replace_attr(|groups: &[String], mut attr: Attr| {
///         if groups.is_empty() && attr.key == "err" {
///             attr.key = "error".to_string();
///         }
///         attr
///     })
///     .build();
///
/// assert!(options.enabled(LogLevel::Debug));
/// ```
#[derive(Default)]
pub struct HandlerOptionsBuilder {
    options: HandlerOptions,
}

impl HandlerOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.options.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn add_source(mut self, enabled: bool) -> Self {
        self.options.add_source = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn replace_attr<F>(mut self, replace: F) -> Self
    where
        F: Fn(&[String], Attr) -> Attr + Send + Sync + 'static,
    {
        self.options.replace_attr = Some(Arc::new(replace));
        self
    }

    pub fn build(self) -> HandlerOptions {
        self.options
    }
}

/// Compiles records against its scope and hands them to an appender.
///
/// Cloning is cheap; clones share options, appender and scope nodes.
#[derive(Clone)]
pub struct Handler {
    options: Arc<HandlerOptions>,
    scope: ScopeChain,
    appender: Arc<dyn Appender>,
}

impl Handler {
    pub fn new(appender: Arc<dyn Appender>, options: HandlerOptions) -> Self {
        Self {
            options: Arc::new(options),
            scope: ScopeChain::root(),
            appender,
        }
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.options.enabled(level)
    }

    /// Derive a handler that binds `attrs` at the current group.
    #[must_use]
    pub fn with_attrs<I>(&self, attrs: I) -> Self
    where
        I: IntoIterator<Item = Attr>,
    {
        Self {
            options: Arc::clone(&self.options),
            scope: self.scope.with_attrs(attrs),
            appender: Arc::clone(&self.appender),
        }
    }

    /// Derive a handler whose later attributes nest under `name`.
    #[must_use]
    pub fn with_group(&self, name: impl Into<String>) -> Self {
        Self {
            options: Arc::clone(&self.options),
            scope: self.scope.with_group(name),
            appender: Arc::clone(&self.appender),
        }
    }

    pub fn options(&self) -> &HandlerOptions {
        &self.options
    }

    pub fn scope(&self) -> &ScopeChain {
        &self.scope
    }

    pub fn appender(&self) -> &dyn Appender {
        self.appender.as_ref()
    }

    /// Compile without writing.
    ///
    /// With `add_source` on, a call-site without a function name gets one
    /// from the live stack, which still holds the logging call.
    pub fn compile(&self, mut entry: LogEntry) -> Option<Document> {
        if self.options.add_source && self.options.enabled(entry.level) {
            if let Some(source) = entry.source.as_mut() {
                source.resolve_function();
            }
        }
        compiler::compile(&self.scope, entry, &self.options)
    }

    /// Compile and append a record.
    ///
    /// Returns the written document, or `None` when the level was filtered
    /// and nothing reached the appender.
    pub fn handle(&self, entry: LogEntry) -> Result<Option<Document>> {
        match self.compile(entry) {
            Some(document) => {
                self.appender.append(&document)?;
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.appender.flush()
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("options", &self.options)
            .field("groups", &self.scope.groups())
            .field("appender", &self.appender.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LoggerError;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct CaptureAppender {
        documents: Mutex<Vec<Document>>,
    }

    impl Appender for CaptureAppender {
        fn append(&self, document: &Document) -> Result<()> {
            self.documents.lock().push(document.clone());
            Ok(())
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "capture"
        }
    }

    struct FailingAppender;

    impl Appender for FailingAppender {
        fn append(&self, _document: &Document) -> Result<()> {
            Err(LoggerError::appender("failing", "sink closed"))
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_options_default() {
        let options = HandlerOptions::default();
        assert_eq!(options.min_level, LogLevel::Info);
        assert!(!options.add_source);
        assert!(options.replace_attr.is_none());
        assert!(!options.enabled(LogLevel::Debug));
        assert!(options.enabled(LogLevel::Info));
    }

    #[test]
    fn test_filtered_record_never_reaches_appender() {
        let capture = Arc::new(CaptureAppender::default());
        let handler = Handler::new(capture.clone(), HandlerOptions::default());

        let written = handler.handle(LogEntry::new(LogLevel::Debug, "quiet")).unwrap();
        assert!(written.is_none());
        assert!(capture.documents.lock().is_empty());
    }

    #[test]
    fn test_derived_handlers_share_appender() {
        let capture = Arc::new(CaptureAppender::default());
        let handler = Handler::new(capture.clone(), HandlerOptions::default());
        let scoped = handler.with_group("req").with_attrs([Attr::new("id", 7)]);

        handler.handle(LogEntry::new(LogLevel::Info, "plain")).unwrap();
        scoped.handle(LogEntry::new(LogLevel::Info, "scoped")).unwrap();

        let documents = capture.documents.lock();
        assert_eq!(documents.len(), 2);
        assert!(documents[0].get("req").is_none());
        assert_eq!(documents[1].get("req"), Some(&serde_json::json!({"id": 7})));
    }

    #[test]
    fn test_appender_error_propagates() {
        let handler = Handler::new(Arc::new(FailingAppender), HandlerOptions::default());
        let err = handler.handle(LogEntry::new(LogLevel::Error, "lost")).unwrap_err();
        assert!(matches!(err, LoggerError::AppenderError { .. }));
    }
}
