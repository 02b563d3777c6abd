//! The document value model: a tagged variant replacing the untyped
//! mapping/attribute-object duality of the system this crate was distilled
//! from. Every document field holds exactly one of these shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A document field's value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Sequence(Vec<FieldValue>),
    Map(Document),
    Null,
}

impl FieldValue {
    /// The rule-engine's type tag for this value, used by the `type` rule.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::String(_) => "string",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Sequence(_) => "sequence",
            FieldValue::Map(_) => "map",
            FieldValue::Null => "null",
        }
    }

    /// A canonical string key for this value, used by the uniqueness
    /// registry so `FieldValue` doesn't need to implement `Eq`/`Hash`
    /// itself (floats don't).
    #[must_use]
    pub fn canonical_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Numeric value as `f64`, for `$gt`/`$gte`/`$lt`/`$lte` comparisons.
    /// `None` for non-numeric values.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Character length, for `length.{gt,gte,lt,lte}` comparisons. `None`
    /// for non-string values.
    #[must_use]
    pub fn str_len(&self) -> Option<usize> {
        match self {
            FieldValue::String(s) => Some(s.chars().count()),
            _ => None,
        }
    }

    /// Borrowed string content, for `ref`/identifier comparisons. `None`
    /// for non-string values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

/// A document: an ordered field-name to value mapping. The canonical
/// storage shape for every collection's records, at rest and in the schema
/// validator alike.
pub type Document = BTreeMap<String, FieldValue>;
