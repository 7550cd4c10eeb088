//! Rows destined for the INCA table.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One variant row keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportRecord {
    fields: BTreeMap<String, Value>,
}

impl ImportRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(column.into(), value.into());
    }

    pub fn set_null(&mut self, column: impl Into<String>) {
        self.fields.insert(column.into(), Value::Null);
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// String value of a column, `None` for missing, null or non-string values.
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.fields.get(column).and_then(Value::as_str)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for ImportRecord {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Union of the columns used across `records`.
pub fn all_columns(records: &[ImportRecord]) -> BTreeSet<String> {
    records
        .iter()
        .flat_map(|record| record.fields.keys().cloned())
        .collect()
}

/// Gives every record the same column set; columns a record lacks are null.
///
/// Bulk inserts need a uniform column list.
pub fn fill_missing_keys(records: &mut [ImportRecord]) {
    let columns = all_columns(records);
    for record in records.iter_mut() {
        for column in &columns {
            if !record.fields.contains_key(column) {
                record.fields.insert(column.clone(), Value::Null);
            }
        }
    }
}
