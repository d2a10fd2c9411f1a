//! Shape consistency checking
//!
//! The shape of a record is its recursive set of keys: the top-level keys
//! and, for every mapping-valued field, that mapping's keys. Scalars and
//! sequences are leaves. A collection is consistent when every record has
//! the shape of the first one.
//!
//! Checking happens only when a collection is built and when an element is
//! added. Query evaluation never re-checks.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::record::Record;
use crate::query::{QueryError, QueryResult};

/// Recursive key shape of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Scalar or sequence
    Leaf,
    /// Mapping with the shapes of its fields
    Mapping(BTreeMap<String, Shape>),
}

impl Shape {
    /// Computes the shape of a record
    pub fn of(record: &Record) -> Self {
        Shape::Mapping(Self::of_map(record))
    }

    fn of_map(map: &Map<String, Value>) -> BTreeMap<String, Shape> {
        map.iter()
            .map(|(key, value)| (key.clone(), Self::of_value(value)))
            .collect()
    }

    fn of_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Shape::Mapping(Self::of_map(map)),
            _ => Shape::Leaf,
        }
    }

    /// Describes the first difference between two shapes, or `None` if
    /// they are identical.
    pub fn first_mismatch(&self, other: &Shape) -> Option<String> {
        Self::mismatch_at("", self, other)
    }

    fn mismatch_at(prefix: &str, expected: &Shape, actual: &Shape) -> Option<String> {
        match (expected, actual) {
            (Shape::Leaf, Shape::Leaf) => None,
            (Shape::Mapping(_), Shape::Leaf) => {
                Some(format!("'{}' should be a mapping", display_path(prefix)))
            }
            (Shape::Leaf, Shape::Mapping(_)) => {
                Some(format!("'{}' should not be a mapping", display_path(prefix)))
            }
            (Shape::Mapping(exp), Shape::Mapping(act)) => {
                // Key sets first so the reported path is the shallowest one
                if let Some(missing) = exp.keys().find(|k| !act.contains_key(*k)) {
                    return Some(format!("missing key '{}'", make_path(prefix, missing)));
                }
                if let Some(extra) = act.keys().find(|k| !exp.contains_key(*k)) {
                    return Some(format!("unexpected key '{}'", make_path(prefix, extra)));
                }
                exp.iter().find_map(|(key, exp_child)| {
                    let act_child = &act[key];
                    Self::mismatch_at(&make_path(prefix, key), exp_child, act_child)
                })
            }
        }
    }
}

/// Validates shape consistency of records.
pub struct ConsistencyChecker;

impl ConsistencyChecker {
    /// Returns true if every record has the same shape as the first.
    ///
    /// An empty sequence is valid.
    pub fn is_valid(records: &[Record]) -> bool {
        Self::check(records).is_ok()
    }

    /// Returns true if `element` has the shape of the existing records.
    pub fn is_element_valid(element: &Record, records: &[Record]) -> bool {
        match records.first() {
            Some(first) => Self::check_element(element, &Shape::of(first)).is_ok(),
            None => true,
        }
    }

    /// Checks a whole sequence against the shape of its first record.
    ///
    /// # Errors
    ///
    /// `NotConsistentData` naming the first deviating record and path.
    pub fn check(records: &[Record]) -> QueryResult<Option<Shape>> {
        Self::check_entries(records)
    }

    /// Same as [`ConsistencyChecker::check`] over any sequence of records.
    pub fn check_entries<'a, I>(records: I) -> QueryResult<Option<Shape>>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut records = records.into_iter();
        let Some(first) = records.next() else {
            return Ok(None);
        };

        let shape = Shape::of(first);
        for (idx, record) in records.enumerate().map(|(i, r)| (i + 1, r)) {
            if let Some(reason) = shape.first_mismatch(&Shape::of(record)) {
                return Err(QueryError::not_consistent(format!(
                    "Array provided has no consistent data: record {} {}.",
                    idx, reason
                )));
            }
        }

        Ok(Some(shape))
    }

    /// Checks a single record against an established shape.
    pub fn check_element(element: &Record, shape: &Shape) -> QueryResult<()> {
        match shape.first_mismatch(&Shape::of(element)) {
            Some(reason) => Err(QueryError::not_consistent(format!(
                "Element provided has no consistent data: {}.",
                reason
            ))),
            None => Ok(()),
        }
    }
}

fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "$root"
    } else {
        path
    }
}
