//! Record compiler
//!
//! Turns a scope chain plus one [`LogEntry`] into the JSON document Cloud
//! Logging expects:
//!
//! 1. level gate
//! 2. default keys (`time`, `severity`, `message`, optional source location)
//! 3. scope-chain groups and attributes, root to leaf
//! 4. call-site attributes at the innermost group
//! 5. error-report reshaping when a top-level attribute wrote `error`

use super::error_report::{self, ERROR_REPORT_TYPE_KEY, ERROR_REPORT_TYPE_VALUE, REPORT_LOCATION_KEY};
use super::fields::{AttrWriter, Fields, Slot};
use super::handler::HandlerOptions;
use super::log_entry::LogEntry;
use super::scope::ScopeChain;
use super::severity::{LEVEL_KEY, MESSAGE_KEY, MSG_KEY, SOURCE_KEY, TIME_KEY};
use super::value::Attr;
use serde::Serialize;

/// Compiled record, ready for encoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document(serde_json::Map<String, serde_json::Value>);

impl Document {
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Whether the document carries the Error Reporting type marker.
    pub fn is_error_report(&self) -> bool {
        self.0.get(ERROR_REPORT_TYPE_KEY).and_then(|v| v.as_str()) == Some(ERROR_REPORT_TYPE_VALUE)
    }

    pub fn as_map(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.0
    }

    pub fn into_map(self) -> serde_json::Map<String, serde_json::Value> {
        self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        serde_json::Value::Object(self.0)
    }

    /// Serialize to a single-line JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }
}

/// Compile one record, or return `None` when its level is filtered out.
pub fn compile(scope: &ScopeChain, entry: LogEntry, options: &HandlerOptions) -> Option<Document> {
    if !options.enabled(entry.level) {
        return None;
    }

    let writer = AttrWriter::new(options.replace_attr.as_deref());
    let LogEntry {
        level,
        message,
        timestamp,
        source,
        attrs,
    } = entry;

    let mut root = Fields::default();
    let mut defaults = vec![
        Attr::new(TIME_KEY, timestamp),
        Attr::new(LEVEL_KEY, level),
        Attr::new(MSG_KEY, message),
    ];
    if options.add_source {
        if let Some(source) = source {
            defaults.push(Attr::new(SOURCE_KEY, source));
        }
    }
    for attr in defaults {
        let attr = writer.rewrite(&[], attr);
        if !attr.key.is_empty() {
            root.set(attr.key, Slot::Field(attr.value));
        }
    }

    // Fold the levels from the innermost outwards so each finished level can
    // be attached to its parent, or dropped when empty.
    let segments = scope.segments();
    let names: Vec<String> = segments
        .iter()
        .filter_map(|segment| segment.group.map(str::to_owned))
        .collect();
    let innermost = segments.len() - 1;
    let mut call_attrs = Some(attrs);
    let mut child: Option<Fields> = None;

    for (depth, segment) in segments.iter().enumerate().rev() {
        let groups = &names[..depth];
        let mut fields = if depth == 0 {
            std::mem::take(&mut root)
        } else {
            Fields::default()
        };

        for attr in &segment.attrs {
            writer.insert(&mut fields, groups, (*attr).clone());
        }
        if depth == innermost {
            for attr in call_attrs.take().into_iter().flatten() {
                writer.insert(&mut fields, groups, attr);
            }
        }
        if let Some(nested) = child.take() {
            if !nested.is_empty() {
                fields.set(names[depth].clone(), Slot::Group(nested));
            }
        }
        child = Some(fields);
    }
    let root = child.unwrap_or_default();

    let report = root.error().map(error_report::extract);

    let mut document = root.into_json();
    if let Some(report) = report {
        document.insert(
            ERROR_REPORT_TYPE_KEY.to_string(),
            serde_json::Value::String(ERROR_REPORT_TYPE_VALUE.to_string()),
        );
        document.insert(MESSAGE_KEY.to_string(), serde_json::Value::String(report.message));
        if let Some(location) = report.location {
            let location = serde_json::to_value(&location)
                .unwrap_or_else(|e| serde_json::Value::String(format!("!ERROR: {}", e)));
            document.insert(REPORT_LOCATION_KEY.to_string(), location);
        }
    }

    Some(Document(document))
}
