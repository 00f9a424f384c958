/*!
 * Row models shared by primary entities and translation records.
 *
 * A `Record` is an ordered column map plus the snapshot last synced with
 * storage, which is what dirty tracking compares against.
 */

use rusqlite::types::{Value as SqlValue, ValueRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Column name to value map for one row
pub type Attributes = BTreeMap<String, Value>;

/// Convert a JSON attribute value into a SQLite value
pub fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                SqlValue::Integer(i)
            } else {
                SqlValue::Real(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => SqlValue::Text(s.clone()),
        // Nested structures are stored as their JSON text
        other => SqlValue::Text(other.to_string()),
    }
}

/// Convert a SQLite column value into a JSON attribute value
pub fn from_sql_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::String(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Whether two values would be stored as the same SQLite value
pub fn same_stored_value(a: &Value, b: &Value) -> bool {
    a == b || to_sql_value(a) == to_sql_value(b)
}

/// A single row with dirty tracking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Current values
    attributes: Attributes,
    /// Values as last read from or written to storage
    original: Attributes,
    /// Whether the row exists in storage
    exists: bool,
}

impl Record {
    /// Create an empty record that has never been stored
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record from a row just read from storage
    pub fn from_storage(attributes: Attributes) -> Self {
        Self {
            original: attributes.clone(),
            attributes,
            exists: true,
        }
    }

    /// Create an unstored record whose seeded `attributes` do not count as
    /// changes; see `has_changes`
    pub fn pending(attributes: Attributes) -> Self {
        Self {
            original: attributes.clone(),
            attributes,
            exists: false,
        }
    }

    /// Get an attribute, treating SQL NULL as absent
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    /// Get a text attribute
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Get an integer attribute
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    /// Set an attribute in memory
    pub fn set(&mut self, key: &str, value: Value) {
        self.attributes.insert(key.to_string(), value);
    }

    /// All current attributes
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Whether the row exists in storage
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Value of `key` as last synced with storage
    pub fn original(&self, key: &str) -> Option<&Value> {
        self.original.get(key).filter(|v| !v.is_null())
    }

    /// Whether the row needs writing: new, or changed since last sync
    pub fn is_dirty(&self) -> bool {
        !self.exists || self.has_changes()
    }

    /// Whether any attribute differs from the snapshot, regardless of
    /// whether the row is stored yet
    pub fn has_changes(&self) -> bool {
        self.attributes.iter().any(|(key, value)| self.is_changed(key, value))
    }

    /// Attributes whose value differs from the stored snapshot
    pub fn dirty_attributes(&self) -> Attributes {
        self.attributes
            .iter()
            .filter(|(key, value)| self.is_changed(key, value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    fn is_changed(&self, key: &str, value: &Value) -> bool {
        self.original
            .get(key)
            .is_none_or(|stored| !same_stored_value(stored, value))
    }

    /// Mark the current state as stored
    pub fn sync_original(&mut self) {
        self.original = self.attributes.clone();
        self.exists = true;
    }
}
