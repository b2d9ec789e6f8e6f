//! Structured records extracted from pages
//!
//! A [`Record`] is an ordered mapping of field names to JSON values (strings,
//! nested objects, arrays of records). Fields are only ever added or
//! replaced; nothing in this crate removes a field from a record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How detail fields are merged into a record that already has them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Only fields absent from the record are added (first write wins)
    #[default]
    KeepExisting,
    /// Incoming fields replace existing ones (last write wins)
    Overwrite,
}

/// One structured result extracted from a page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builds a record from a JSON value; non-object values give an empty record
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String value of a field, if it is a string
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// The record's own link; identifies it within one listing traversal
    pub fn url(&self) -> Option<&str> {
        self.get_str("url")
    }

    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Merges every field of `patch` into this record
    ///
    /// Returns how many fields were written. Merging is per field, so a patch
    /// applied before a later failure stays applied.
    pub fn merge(&mut self, patch: Record, policy: MergePolicy) -> usize {
        let mut written = 0;
        for (field, value) in patch.0 {
            if policy == MergePolicy::KeepExisting && self.0.contains_key(&field) {
                continue;
            }
            self.0.insert(field, value);
            written += 1;
        }
        written
    }

    /// Consuming form of [`Record::merge`]
    pub fn merged(mut self, patch: Record, policy: MergePolicy) -> Self {
        self.merge(patch, policy);
        self
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.into_value()
    }
}
