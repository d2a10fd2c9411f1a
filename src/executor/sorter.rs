//! Result sorting
//!
//! The sort is always an ascending, stable pass. Descending orders reverse
//! the ascending result afterwards, so rows with equal keys come out in the
//! reverse of their ascending order.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde_json::Value;

use super::dates::DateFormat;
use super::operators::numeric_str;
use super::resolver::KeyResolver;
use crate::collection::Record;
use crate::query::{QueryResult, SortSpec};

/// Sorts records
pub struct ResultSorter;

/// Precomputed sort key of one record
#[derive(Debug)]
enum SortKey {
    Date(Option<NaiveDateTime>),
    Plain(Value),
}

impl ResultSorter {
    /// Sorts records according to the sort specification.
    ///
    /// Keys are resolved up front so a missing key fails before anything
    /// is reordered.
    ///
    /// # Errors
    ///
    /// `InvalidKey` if the sort key is absent from any record.
    pub fn sort(
        records: Vec<Record>,
        spec: &SortSpec,
        default_format: &DateFormat,
    ) -> QueryResult<Vec<Record>> {
        let date_format = match (&spec.date_format, spec.order.is_date()) {
            (Some(f), _) => Some(DateFormat::new(f)),
            (None, true) => Some(default_format.clone()),
            (None, false) => None,
        };

        let mut keyed: Vec<(SortKey, Record)> = records
            .into_iter()
            .map(|record| -> QueryResult<(SortKey, Record)> {
                let value = KeyResolver::resolve(&spec.key, &record)?;
                let key = match &date_format {
                    Some(format) => SortKey::Date(format.parse(value)),
                    None => SortKey::Plain(value.clone()),
                };
                Ok((key, record))
            })
            .collect::<QueryResult<_>>()?;

        keyed.sort_by(|(a, _), (b, _)| Self::compare_keys(a, b));

        let mut sorted: Vec<Record> = keyed.into_iter().map(|(_, r)| r).collect();
        if spec.order.is_descending() {
            sorted.reverse();
        }

        Ok(sorted)
    }

    fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
        match (a, b) {
            // Unparseable dates order first
            (SortKey::Date(x), SortKey::Date(y)) => x.cmp(y),
            (SortKey::Plain(x), SortKey::Plain(y)) => Self::compare_values(x, y),
            (SortKey::Date(_), SortKey::Plain(_)) => Ordering::Less,
            (SortKey::Plain(_), SortKey::Date(_)) => Ordering::Greater,
        }
    }

    /// Compares two JSON values for sorting.
    ///
    /// Ordering rules:
    /// - null < bool < number < string < array < object
    /// - For same types, natural ordering
    /// - Numeric strings compare by value and sort before other strings
    pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
        let type_order = |v: &Value| -> u8 {
            match v {
                Value::Null => 0,
                Value::Bool(_) => 1,
                Value::Number(_) => 2,
                Value::String(_) => 3,
                Value::Array(_) => 4,
                Value::Object(_) => 5,
            }
        };

        let a_type = type_order(a);
        let b_type = type_order(b);
        if a_type != b_type {
            return a_type.cmp(&b_type);
        }

        match (a, b) {
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            (Value::Number(x), Value::Number(y)) => {
                if let (Some(xi), Some(yi)) = (x.as_i64(), y.as_i64()) {
                    return xi.cmp(&yi);
                }
                let xf = x.as_f64().unwrap_or(0.0);
                let yf = y.as_f64().unwrap_or(0.0);
                xf.partial_cmp(&yf).unwrap_or(Ordering::Equal)
            }
            (Value::String(x), Value::String(y)) => match (numeric_str(x), numeric_str(y)) {
                (Some(xf), Some(yf)) => xf.partial_cmp(&yf).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => x.cmp(y),
            },
            (Value::Array(x), Value::Array(y)) => x.len().cmp(&y.len()),
            // Nulls and objects are not compared
            _ => Ordering::Equal,
        }
    }
}
