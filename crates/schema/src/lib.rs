//! # Schema — declarative field-rule validation
//!
//! A schema is an ordered `field -> rule set` mapping. It validates a
//! document against type, uniqueness, enumeration, length, numeric-bound,
//! and cross-collection reference constraints, aborting on the first
//! offending rule so a rejected document leaves storage and the uniqueness
//! registry untouched.
//!
//! The schema never reaches back into a collection or store — that would
//! create an ownership cycle. Uniqueness is checked against a caller-
//! supplied slice of existing documents plus this schema's own in-memory
//! registry; reference checks go through the [`CollectionLookup`] the
//! caller passes in.

mod rules;
mod value;

pub use rules::{Bound, FieldRules, TypeRule};
pub use value::{Document, FieldValue};

use std::collections::HashMap;

use thiserror::Error;

/// The kind of rule a document failed, carrying the offending field name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("field '{field}' must be of type {expected}")]
    Type { field: String, expected: &'static str },
    #[error("field '{field}' must be unique")]
    Unique { field: String },
    #[error("field '{field}' length is out of bounds")]
    Length { field: String },
    #[error("field '{field}' is out of numeric bounds")]
    NumericBound { field: String },
    #[error("field '{field}' is not one of the allowed values")]
    Enum { field: String },
    #[error("field '{field}' references a nonexistent document '{id}' in collection '{collection}'")]
    Reference {
        field: String,
        collection: String,
        id: String,
    },
}

/// Resolves `ref` rules against sibling collections without the schema
/// owning a back-reference to the store. The `document` crate implements
/// this over its collection registry.
pub trait CollectionLookup {
    /// `true` if collection `name` has a live document identified by `id`.
    fn exists(&self, name: &str, id: &str) -> bool;
}

/// A lookup that always reports references as missing — used when no
/// referenced collections were supplied but a `ref` rule is present.
pub struct NoCollections;

impl CollectionLookup for NoCollections {
    fn exists(&self, _name: &str, _id: &str) -> bool {
        false
    }
}

/// An ordered field-rule schema plus its in-memory uniqueness registry.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, FieldRules)>,
    unique_values: HashMap<String, std::collections::HashSet<String>>,
}

impl Schema {
    /// Builds a schema from an ordered list of `(field name, rules)` pairs.
    /// Declaration order determines both the order fields are checked in
    /// and the order field names appear in documentation/error output.
    #[must_use]
    pub fn new(fields: Vec<(String, FieldRules)>) -> Self {
        Self {
            fields,
            unique_values: HashMap::new(),
        }
    }

    /// The declared fields, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[(String, FieldRules)] {
        &self.fields
    }

    /// `true` if any field declares a `unique` rule — the collection layer
    /// uses this to decide whether an insert/update needs to gather
    /// existing documents at all.
    #[must_use]
    pub fn has_unique_fields(&self) -> bool {
        self.fields.iter().any(|(_, rules)| rules.unique)
    }

    /// Validates `doc` against every declared rule, in field-declaration
    /// order and, within a field, `type` before `unique` before
    /// `length`/`numeric` before `enum` before `ref`. Stops at the first
    /// failure.
    ///
    /// `existing_docs` are the collection's other live documents (the
    /// document being updated, if any, excluded by the caller) — combined
    /// with this schema's own registry for uniqueness checks. `exclude` is
    /// the prior state of the document being updated (`None` for an insert):
    /// a unique field whose value is unchanged from `exclude` is not treated
    /// as a registry clash against itself. `lookup` resolves `ref` rules.
    pub fn validate(
        &self,
        doc: &Document,
        existing_docs: &[&Document],
        lookup: &dyn CollectionLookup,
        exclude: Option<&Document>,
    ) -> Result<(), ValidationError> {
        for (field, rules) in &self.fields {
            let Some(value) = doc.get(field) else {
                continue;
            };

            if let Some(type_rule) = rules.r#type {
                if !type_rule.matches(value) {
                    return Err(ValidationError::Type {
                        field: field.clone(),
                        expected: type_name(type_rule),
                    });
                }
            }

            if rules.unique {
                let key = value.canonical_key();
                let clashes_existing = existing_docs
                    .iter()
                    .any(|other| other.get(field).map(FieldValue::canonical_key).as_deref() == Some(key.as_str()));
                let is_own_prior_value = exclude
                    .and_then(|prior| prior.get(field))
                    .map(FieldValue::canonical_key)
                    .as_deref()
                    == Some(key.as_str());
                let clashes_registry = !is_own_prior_value
                    && self
                        .unique_values
                        .get(field)
                        .is_some_and(|set| set.contains(&key));
                if clashes_existing || clashes_registry {
                    return Err(ValidationError::Unique {
                        field: field.clone(),
                    });
                }
            }

            if let Some(bound) = &rules.length {
                if let Some(len) = value.str_len() {
                    if !bound.check(len as f64) {
                        return Err(ValidationError::Length {
                            field: field.clone(),
                        });
                    }
                }
            }

            if let Some(bound) = &rules.numeric {
                if let Some(n) = value.as_f64() {
                    if !bound.check(n) {
                        return Err(ValidationError::NumericBound {
                            field: field.clone(),
                        });
                    }
                }
            }

            if let Some(allowed) = &rules.r#enum {
                if !allowed.iter().any(|a| a == value) {
                    return Err(ValidationError::Enum {
                        field: field.clone(),
                    });
                }
            }

            if let Some(collection) = &rules.reference {
                if let Some(id) = value.as_str() {
                    if !lookup.exists(collection, id) {
                        return Err(ValidationError::Reference {
                            field: field.clone(),
                            collection: collection.clone(),
                            id: id.to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Records `doc`'s unique-field values into the registry. Called by the
    /// caller only after a successful [`Schema::validate`], never before —
    /// a rejected document must not pollute the registry.
    pub fn register(&mut self, doc: &Document) {
        for (field, rules) in &self.fields {
            if !rules.unique {
                continue;
            }
            if let Some(value) = doc.get(field) {
                self.unique_values
                    .entry(field.clone())
                    .or_default()
                    .insert(value.canonical_key());
            }
        }
    }

    /// Updates the registry for a document whose fields changed from `prior`
    /// to `updated`: each unique field's old value is removed before the new
    /// one is inserted, so a field value that is no longer held by any
    /// document doesn't linger in the registry and block its reuse. Called
    /// by the caller only after a successful [`Schema::validate`].
    pub fn reregister(&mut self, prior: &Document, updated: &Document) {
        for (field, rules) in &self.fields {
            if !rules.unique {
                continue;
            }
            if let Some(prior_value) = prior.get(field) {
                if let Some(set) = self.unique_values.get_mut(field) {
                    set.remove(&prior_value.canonical_key());
                }
            }
            if let Some(new_value) = updated.get(field) {
                self.unique_values
                    .entry(field.clone())
                    .or_default()
                    .insert(new_value.canonical_key());
            }
        }
    }
}

fn type_name(rule: TypeRule) -> &'static str {
    match rule {
        TypeRule::String => "string",
        TypeRule::Integer => "integer",
        TypeRule::Float => "float",
        TypeRule::Boolean => "boolean",
        TypeRule::Sequence => "sequence",
        TypeRule::Map => "map",
    }
}
