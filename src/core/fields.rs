//! Ordered per-level field maps used while compiling a record

use super::error_report::ERROR_KEY;
use super::handler::ReplaceAttr;
use super::severity;
use super::value::{Attr, Value};

pub(crate) enum Slot {
    Field(Value),
    Group(Fields),
}

/// One nesting level of a document under construction.
///
/// Keys keep their first insertion position; a repeated key replaces the
/// earlier value.
#[derive(Default)]
pub(crate) struct Fields {
    entries: Vec<(String, Slot)>,
    /// Value of the attribute that last wrote `error` at the root, before
    /// valuer resolution or group expansion.
    error: Option<Value>,
}

impl Fields {
    pub(crate) fn set(&mut self, key: String, slot: Slot) {
        if key == ERROR_KEY {
            self.error = None;
        }
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = slot,
            None => self.entries.push((key, slot)),
        }
    }

    /// Value to build an error report from, if an attribute wrote `error`.
    pub(crate) fn error(&self) -> Option<&Value> {
        self.error.as_ref()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_json(self) -> serde_json::Map<String, serde_json::Value> {
        self.entries
            .into_iter()
            .map(|(key, slot)| {
                let json = match slot {
                    Slot::Field(value) => value.to_json(),
                    Slot::Group(nested) => serde_json::Value::Object(nested.into_json()),
                };
                (key, json)
            })
            .collect()
    }
}

/// Inserts attributes into `Fields`, running the rewrite hook on every
/// non-group attribute with its group path.
///
/// A record writer also applies the Cloud Logging key table to top-level
/// attributes after the hook; a plain writer only converts values.
pub(crate) struct AttrWriter<'a> {
    replace: Option<&'a ReplaceAttr>,
    translate: bool,
}

impl<'a> AttrWriter<'a> {
    pub(crate) fn new(replace: Option<&'a ReplaceAttr>) -> Self {
        Self {
            replace,
            translate: true,
        }
    }

    pub(crate) fn plain() -> Self {
        Self {
            replace: None,
            translate: false,
        }
    }

    pub(crate) fn rewrite(&self, groups: &[String], attr: Attr) -> Attr {
        let attr = match self.replace {
            Some(replace) => replace(groups, attr),
            None => attr,
        };
        if self.translate {
            severity::replace_attr(groups, attr)
        } else {
            attr
        }
    }

    pub(crate) fn insert(&self, fields: &mut Fields, groups: &[String], attr: Attr) {
        let Attr { key, value } = attr;
        let Some(attr) = self.insert_if_group(fields, groups, key, value) else {
            return;
        };

        let Attr { key, value } = self.rewrite(groups, attr);
        if key.is_empty() {
            return;
        }
        if let Some(Attr { key, value }) = self.insert_if_group(fields, groups, key, value) {
            let reported = is_root_error(groups, &key).then(|| value.clone());
            fields.set(key, Slot::Field(value));
            if reported.is_some() {
                fields.error = reported;
            }
        }
    }

    /// Resolve `value` and write it at once when it is a group; any other
    /// value is handed back.
    fn insert_if_group(&self, fields: &mut Fields, groups: &[String], key: String, value: Value) -> Option<Attr> {
        let reported = is_root_error(groups, &key).then(|| value.clone());
        match value.resolve() {
            Value::Group(attrs) => {
                if self.insert_group(fields, groups, key, attrs) && reported.is_some() {
                    fields.error = reported;
                }
                None
            }
            value => Some(Attr { key, value }),
        }
    }

    /// Returns whether a keyed group was written.
    fn insert_group(&self, fields: &mut Fields, groups: &[String], key: String, attrs: Vec<Attr>) -> bool {
        if key.is_empty() {
            for attr in attrs {
                self.insert(fields, groups, attr);
            }
            return false;
        }

        let mut path = groups.to_vec();
        path.push(key.clone());
        let mut nested = Fields::default();
        for attr in attrs {
            self.insert(&mut nested, &path, attr);
        }
        if nested.is_empty() {
            return false;
        }
        fields.set(key, Slot::Group(nested));
        true
    }

    pub(crate) fn group_to_json(&self, attrs: &[Attr]) -> serde_json::Map<String, serde_json::Value> {
        let mut fields = Fields::default();
        for attr in attrs {
            self.insert(&mut fields, &[], attr.clone());
        }
        fields.into_json()
    }
}

fn is_root_error(groups: &[String], key: &str) -> bool {
    groups.is_empty() && key == ERROR_KEY
}
