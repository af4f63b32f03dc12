//! The root document: every collection, persisted as one unit.

use crate::record::json_type_name;
use crate::{Collection, Record, StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Collection name to records.
///
/// Collections that the store does not know about (for example from an
/// imported backup written by a newer build) are carried along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    collections: BTreeMap<String, Vec<Record>>,
}

impl Document {
    /// A document with every known collection present and empty.
    pub fn empty() -> Self {
        let mut doc = Self::default();
        doc.ensure_known_collections();
        doc
    }

    /// Add any missing known collection as an empty sequence.
    pub fn ensure_known_collections(&mut self) {
        for collection in Collection::ALL {
            self.collections
                .entry(collection.as_str().to_string())
                .or_default();
        }
    }

    pub fn records(&self, collection: Collection) -> &[Record] {
        self.collections
            .get(collection.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First profile whose `email` is exactly `email`.
    pub(crate) fn profile_by_email(&self, email: &str) -> Option<&Record> {
        self.records(Collection::Profiles)
            .iter()
            .find(|p| p.get("email").and_then(Value::as_str) == Some(email))
    }

    pub fn records_mut(&mut self, collection: Collection) -> &mut Vec<Record> {
        self.collections
            .entry(collection.as_str().to_string())
            .or_default()
    }

    /// Names of all collections held, known or not.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Total number of records across all collections.
    pub fn record_count(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }

    /// Parse a serialized document: an object whose values are arrays of
    /// objects. Known collections missing from the text are added empty.
    pub fn parse(text: &str) -> StoreResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| StoreError::malformed(format!("document is not valid JSON: {}", e)))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> StoreResult<Self> {
        let root = match value {
            Value::Object(root) => root,
            other => {
                return Err(StoreError::malformed(format!(
                    "document must be an object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        let mut collections = BTreeMap::new();
        for (name, items) in root {
            let items = match items {
                Value::Array(items) => items,
                other => {
                    return Err(StoreError::malformed(format!(
                        "collection '{}' must be an array, got {}",
                        name,
                        json_type_name(&other)
                    )))
                }
            };
            let mut records = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                match item {
                    Value::Object(record) => records.push(record),
                    other => {
                        return Err(StoreError::malformed(format!(
                            "{}[{}] must be an object, got {}",
                            name,
                            i,
                            json_type_name(&other)
                        )))
                    }
                }
            }
            collections.insert(name, records);
        }

        let mut doc = Self { collections };
        doc.ensure_known_collections();
        Ok(doc)
    }

    pub fn to_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
