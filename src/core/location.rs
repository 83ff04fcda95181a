//! Source-code coordinates attached to log records and error reports
//!
//! - `SourceLocation`: where a logging call was made
//!   (`logging.googleapis.com/sourceLocation`)
//! - `ReportLocation`: where an error originated (`reportLocation`)

use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;
use std::panic::Location;

/// Call-site of a logging statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub function: String,
    pub file: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            function: function.into(),
            file: file.into(),
            line,
        }
    }

    /// Location of the caller, as tracked through `#[track_caller]` frames.
    ///
    /// `Location` carries no function name, so `function` is left empty
    /// until [`resolve_function`](Self::resolve_function) fills it.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }

    /// Fill an empty `function` from the live call stack.
    ///
    /// Only works while the frame at `file:line` is still on the stack and
    /// debug info is available; otherwise `function` stays empty.
    pub fn resolve_function(&mut self) {
        if self.function.is_empty() {
            if let Some(name) = function_at(&Backtrace::force_capture(), &self.file, self.line) {
                self.function = name;
            }
        }
    }
}

impl From<&Location<'_>> for SourceLocation {
    fn from(location: &Location<'_>) -> Self {
        Self::new("", location.file(), location.line())
    }
}

/// Origin of a reported error, in Error Reporting's `reportLocation` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLocation {
    pub file_path: String,
    pub line_number: u32,
    pub function_name: String,
}

impl ReportLocation {
    pub fn new(file_path: impl Into<String>, line_number: u32, function_name: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            line_number,
            function_name: function_name.into(),
        }
    }

    /// Location of the caller; `function_name` stays empty.
    ///
    /// Prefer [`report_location!`](crate::report_location) when the enclosing
    /// function name is wanted too.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line(), "")
    }
}

/// Name of the innermost frame in `backtrace` that sits at `file:line`.
pub(crate) fn function_at(backtrace: &Backtrace, file: &str, line: u32) -> Option<String> {
    let text = backtrace.to_string();
    let mut function = None;
    for row in text.lines().map(str::trim) {
        if let Some(position) = row.strip_prefix("at ") {
            if is_position(position, file, line) {
                return function.map(strip_hash);
            }
        } else if !row.is_empty() {
            // "12: path::to::function", or a bare name for an inlined symbol
            let name = match row.split_once(": ") {
                Some((index, name)) if index.bytes().all(|b| b.is_ascii_digit()) => name,
                _ => row,
            };
            function = Some(name);
        }
    }
    None
}

fn is_position(position: &str, file: &str, line: u32) -> bool {
    let Some((rest, _column)) = position.rsplit_once(':') else {
        return false;
    };
    let Some((path, row)) = rest.rsplit_once(':') else {
        return false;
    };
    if row.parse::<u32>().ok() != Some(line) {
        return false;
    }
    let path = path.replace('\\', "/");
    let file = file.replace('\\', "/");
    path == file || path.ends_with(&format!("/{file}"))
}

fn strip_hash(name: &str) -> String {
    match name.rsplit_once("::h") {
        Some((head, hash)) if hash.len() == 16 && hash.bytes().all(|b| b.is_ascii_hexdigit()) => {
            head.to_string()
        }
        _ => name.to_string(),
    }
}

impl From<SourceLocation> for ReportLocation {
    fn from(source: SourceLocation) -> Self {
        Self {
            file_path: source.file,
            line_number: source.line,
            function_name: source.function,
        }
    }
}
