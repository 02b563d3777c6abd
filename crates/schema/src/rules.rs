//! Declarative per-field rule sets.

use crate::value::FieldValue;

/// The six value categories a `type` rule can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRule {
    String,
    Integer,
    Float,
    Boolean,
    Sequence,
    Map,
}

impl TypeRule {
    pub(crate) fn matches(self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (TypeRule::String, FieldValue::String(_))
                | (TypeRule::Integer, FieldValue::Integer(_))
                | (TypeRule::Float, FieldValue::Float(_))
                | (TypeRule::Boolean, FieldValue::Boolean(_))
                | (TypeRule::Sequence, FieldValue::Sequence(_))
                | (TypeRule::Map, FieldValue::Map(_))
        )
    }
}

/// An inclusive/exclusive bound pair for `length.*` or `$*` numeric rules.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bound {
    pub gt: Option<f64>,
    pub gte: Option<f64>,
    pub lt: Option<f64>,
    pub lte: Option<f64>,
}

impl Bound {
    pub(crate) fn check(&self, value: f64) -> bool {
        self.gt.map_or(true, |b| value > b)
            && self.gte.map_or(true, |b| value >= b)
            && self.lt.map_or(true, |b| value < b)
            && self.lte.map_or(true, |b| value <= b)
    }
}

/// The rule set declared for one field.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    pub r#type: Option<TypeRule>,
    pub unique: bool,
    pub r#enum: Option<Vec<FieldValue>>,
    pub length: Option<Bound>,
    pub numeric: Option<Bound>,
    pub reference: Option<String>,
}

impl FieldRules {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn type_of(mut self, rule: TypeRule) -> Self {
        self.r#type = Some(rule);
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    #[must_use]
    pub fn enum_values(mut self, values: Vec<FieldValue>) -> Self {
        self.r#enum = Some(values);
        self
    }

    #[must_use]
    pub fn length(mut self, bound: Bound) -> Self {
        self.length = Some(bound);
        self
    }

    #[must_use]
    pub fn numeric(mut self, bound: Bound) -> Self {
        self.numeric = Some(bound);
        self
    }

    #[must_use]
    pub fn reference(mut self, collection: impl Into<String>) -> Self {
        self.reference = Some(collection.into());
        self
    }
}
