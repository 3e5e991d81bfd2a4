//! Field index for exact-match and array-contains lookups.

use mend_core::{Fields, Value};
use std::collections::{HashMap, HashSet};

/// Key for the field index: (collection, field name, value)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldKey {
    pub collection: String,
    pub field: String,
    pub value: IndexValue,
}

/// Simplified value for field indexing.
/// Only scalar exact matches are indexed (no floats, lists or maps).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndexValue {
    Null,
    Bool(bool),
    Int(i64),
    String(String),
}

impl IndexValue {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(IndexValue::Null),
            Value::Bool(b) => Some(IndexValue::Bool(*b)),
            Value::Int(i) => Some(IndexValue::Int(*i)),
            Value::String(s) => Some(IndexValue::String(s.clone())),
            // Float, List, Map are not indexed for exact match
            _ => None,
        }
    }
}

/// Field index: (collection, field, value) -> Set<document id>
#[derive(Debug, Default)]
pub struct FieldIndex {
    /// Exact match on scalar field values
    exact: HashMap<FieldKey, HashSet<String>>,
    /// Membership of scalar elements inside list fields
    contains: HashMap<FieldKey, HashSet<String>>,
}

impl FieldIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every field of a document.
    pub fn insert_document(&mut self, collection: &str, id: &str, fields: &Fields) {
        for (field, value) in fields {
            self.insert(collection, field, value, id);
        }
    }

    /// Drop every field of a document from the index.
    pub fn remove_document(&mut self, collection: &str, id: &str, fields: &Fields) {
        for (field, value) in fields {
            self.remove(collection, field, value, id);
        }
    }

    pub fn insert(&mut self, collection: &str, field: &str, value: &Value, id: &str) {
        if let Some(key) = key_for(collection, field, value) {
            self.exact.entry(key).or_default().insert(id.to_string());
        }

        if let Value::List(items) = value {
            for item in items {
                if let Some(key) = key_for(collection, field, item) {
                    self.contains.entry(key).or_default().insert(id.to_string());
                }
            }
        }
    }

    pub fn remove(&mut self, collection: &str, field: &str, value: &Value, id: &str) {
        if let Some(key) = key_for(collection, field, value) {
            remove_from(&mut self.exact, key, id);
        }

        if let Value::List(items) = value {
            for item in items {
                if let Some(key) = key_for(collection, field, item) {
                    remove_from(&mut self.contains, key, id);
                }
            }
        }
    }

    /// Ids whose `field` equals `value`, or `None` if the value is not indexable.
    pub fn find_exact(&self, collection: &str, field: &str, value: &Value) -> Option<Vec<String>> {
        let key = key_for(collection, field, value)?;
        Some(collect_sorted(self.exact.get(&key)))
    }

    /// Ids whose list `field` holds `value`, or `None` if the value is not indexable.
    pub fn find_containing(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Option<Vec<String>> {
        let key = key_for(collection, field, value)?;
        Some(collect_sorted(self.contains.get(&key)))
    }
}

fn key_for(collection: &str, field: &str, value: &Value) -> Option<FieldKey> {
    IndexValue::from_value(value).map(|value| FieldKey {
        collection: collection.to_string(),
        field: field.to_string(),
        value,
    })
}

fn remove_from(index: &mut HashMap<FieldKey, HashSet<String>>, key: FieldKey, id: &str) {
    if let Some(set) = index.get_mut(&key) {
        set.remove(id);
        if set.is_empty() {
            index.remove(&key);
        }
    }
}

fn collect_sorted(ids: Option<&HashSet<String>>) -> Vec<String> {
    let mut ids: Vec<String> = ids.into_iter().flatten().cloned().collect();
    ids.sort();
    ids
}
