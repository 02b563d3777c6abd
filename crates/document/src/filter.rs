//! Flat conjunctive filters evaluated against a document during a scan.

use schema::{Document, FieldValue};

/// One field's filter condition: either an equality literal or a set of
/// comparison operators.
#[derive(Debug, Clone)]
pub enum FieldFilter {
    /// Shorthand for `{"$eq": value}`.
    Eq(FieldValue),
    /// `(operator, bound)` pairs; an operator outside `$eq,$gt,$gte,$lt,$lte`
    /// is ignored and contributes no constraint.
    Ops(Vec<(String, FieldValue)>),
}

/// A flat conjunction of per-field conditions. Every entry must match for a
/// document to match the filter as a whole.
pub type Filter = Vec<(String, FieldFilter)>;

/// `true` if `doc` satisfies every clause in `filter`. An absent filter
/// matches everything.
#[must_use]
pub fn matches(doc: &Document, filter: Option<&Filter>) -> bool {
    let Some(filter) = filter else {
        return true;
    };

    filter.iter().all(|(field, cond)| {
        let value = doc.get(field);
        match cond {
            FieldFilter::Eq(expected) => value == Some(expected),
            FieldFilter::Ops(ops) => ops
                .iter()
                .all(|(op, bound)| value.is_some_and(|v| compare(op, v, bound))),
        }
    })
}

fn compare(op: &str, value: &FieldValue, bound: &FieldValue) -> bool {
    match op {
        "$eq" => value == bound,
        "$gt" | "$gte" | "$lt" | "$lte" => {
            let ordering = match (value.as_f64(), bound.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => match (value.as_str(), bound.as_str()) {
                    (Some(a), Some(b)) => Some(a.cmp(b)),
                    _ => None,
                },
            };
            match (op, ordering) {
                ("$gt", Some(std::cmp::Ordering::Greater)) => true,
                ("$gte", Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)) => true,
                ("$lt", Some(std::cmp::Ordering::Less)) => true,
                ("$lte", Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)) => true,
                _ => false,
            }
        }
        // Unrecognized operators are ignored: they contribute no constraint.
        _ => true,
    }
}
