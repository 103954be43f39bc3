//! Records returned by a [`QueryProvider`](super::QueryProvider).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A single model instance: a key, its attributes and eager-loaded relations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Model identifier this record belongs to (e.g. `app::models::Post`).
    pub model: String,

    /// Primary key.
    pub key: Value,

    /// Column values.
    #[serde(default)]
    pub attributes: Map<String, Value>,

    /// Related records keyed by relation name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relations: BTreeMap<String, Vec<Record>>,
}

impl Record {
    /// Create a record with no attributes.
    pub fn new(model: impl Into<String>, key: impl Into<Value>) -> Self {
        Self {
            model: model.into(),
            key: key.into(),
            attributes: Map::new(),
            relations: BTreeMap::new(),
        }
    }

    /// Set an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Attach a relation.
    pub fn with_relation(mut self, name: impl Into<String>, records: Vec<Record>) -> Self {
        self.relations.insert(name.into(), records);
        self
    }

    /// Get an attribute value. `"id"` falls back to the primary key.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        match self.attributes.get(name) {
            Some(value) => Some(value),
            None if name == "id" => Some(&self.key),
            None => None,
        }
    }

    /// Get an attribute rendered as plain text. Null and missing are `None`.
    pub fn attribute_string(&self, name: &str) -> Option<String> {
        self.attribute(name).and_then(value_to_string)
    }

    /// Records of a relation (empty when not loaded).
    pub fn related(&self, relation: &str) -> &[Record] {
        self.relations.get(relation).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Value used in URLs: `key_name` when given, else the primary key.
    pub fn route_key(&self, key_name: Option<&str>) -> Option<String> {
        match key_name {
            Some(name) => self.attribute_string(name),
            None => value_to_string(&self.key),
        }
    }
}

/// Render scalar JSON values as text; structured values are serialized.
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
