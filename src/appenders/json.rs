//! JSON appender for structured logging

use crate::core::{Appender, Document, LoggerError, Result};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// JSON appender writing one document per line (JSONL)
///
/// Encoding happens outside the lock; the encoded line is written with a
/// single `write_all` under the lock, so concurrent records never
/// interleave. Writing to stdout is what the Cloud Logging agents on GKE,
/// Cloud Run and App Engine pick up.
pub struct JsonAppender<W: Write + Send> {
    writer: Mutex<W>,
    pretty: bool,
    name: String,
}

impl<W: Write + Send> JsonAppender<W> {
    /// Create a JSON appender over any writer
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            pretty: false,
            name: "json".to_string(),
        }
    }

    /// Pretty-print documents (multi-line; for local debugging only)
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Run `f` with exclusive access to the underlying writer
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        let mut writer = self.writer.lock();
        f(&mut *writer)
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl JsonAppender<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout()).with_name("json-stdout")
    }
}

impl JsonAppender<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr()).with_name("json-stderr")
    }
}

impl JsonAppender<BufWriter<File>> {
    /// Append to a file, creating it if needed
    pub fn file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::io_operation("opening log file", path.display().to_string(), e)
            })?;

        Ok(Self::new(BufWriter::new(file)).with_name("json-file"))
    }
}

impl<W: Write + Send> Appender for JsonAppender<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn append(&self, document: &Document) -> Result<()> {
        let mut line = if self.pretty {
            serde_json::to_vec_pretty(document)?
        } else {
            serde_json::to_vec(document)?
        };
        line.push(b'\n');

        self.writer
            .lock()
            .write_all(&line)
            .map_err(|e| LoggerError::appender(&self.name, e.to_string()))
    }

    fn flush(&self) -> Result<()> {
        self.writer
            .lock()
            .flush()
            .map_err(|e| LoggerError::appender(&self.name, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Attr, HandlerOptions, LogEntry, LogLevel, ScopeChain};
    use std::fs;
    use tempfile::tempdir;

    fn document(message: &str, attrs: Vec<Attr>) -> Document {
        crate::core::compile(
            &ScopeChain::root(),
            LogEntry::new(LogLevel::Info, message).with_attrs(attrs),
            &HandlerOptions::default(),
        )
        .expect("info passes the default level")
    }

    #[test]
    fn test_json_appender_writes_lines() -> Result<()> {
        let appender = JsonAppender::new(Vec::new());
        appender.append(&document("first", vec![Attr::new("user_id", 123)]))?;
        appender.append(&document("second with\nnewline", Vec::new()))?;

        let output = String::from_utf8(appender.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0])?;
        assert_eq!(first["message"], "first");
        assert_eq!(first["user_id"], 123);
        assert_eq!(first["severity"], "INFO");

        let second: serde_json::Value = serde_json::from_str(lines[1])?;
        assert_eq!(second["message"], "second with\nnewline");
        Ok(())
    }

    #[test]
    fn test_json_appender_file() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("test.jsonl");

        let appender = JsonAppender::file(&log_path)?;
        for i in 0..5 {
            appender.append(&document(&format!("Iteration {}", i), vec![Attr::new("iteration", i)]))?;
        }
        appender.flush()?;

        let content = fs::read_to_string(&log_path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);

        for line in lines {
            let parsed: serde_json::Value = serde_json::from_str(line)?;
            assert!(parsed["message"].is_string());
            assert!(parsed["time"].is_string());
        }

        Ok(())
    }

    #[test]
    fn test_json_appender_pretty() -> Result<()> {
        let appender = JsonAppender::new(Vec::new()).with_pretty(true);
        appender.append(&document("pretty", Vec::new()))?;

        let output = String::from_utf8(appender.into_inner()).unwrap();
        assert!(output.lines().count() > 1);
        let parsed: serde_json::Value = serde_json::from_str(&output)?;
        assert_eq!(parsed["message"], "pretty");
        Ok(())
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn test_json_appender_write_failure_names_appender() {
        let appender = JsonAppender::new(ClosedPipe).with_name("json-pipe");

        let err = appender.append(&document("lost", Vec::new())).unwrap_err();
        assert!(matches!(
            &err,
            LoggerError::AppenderError { appender, .. } if appender == "json-pipe"
        ));
        assert!(err.to_string().contains("pipe closed"));

        let err = appender.flush().unwrap_err();
        assert_eq!(err.to_string(), "Appender 'json-pipe' failed: pipe closed");
    }

    #[test]
    fn test_json_appender_missing_directory() {
        let dir = tempdir().unwrap();
        let result = JsonAppender::file(dir.path().join("missing").join("x.jsonl"));
        assert!(matches!(result, Err(LoggerError::IoOperation { .. })));
    }
}
