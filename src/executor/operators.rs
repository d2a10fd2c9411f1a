//! Operator registry
//!
//! Maps each operator to its match predicate
//! `match(value, value_to_compare, date_format) -> bool`.
//! The table is a fixed `match`; nothing is registered at runtime.

use std::cmp::Ordering;

use serde_json::Value;

use super::dates::DateFormat;
use crate::query::{Operator, QueryResult};

/// Match predicate signature
pub type MatchFn = fn(&Value, &Value, &DateFormat) -> bool;

/// Immutable operator table
pub struct OperatorRegistry;

impl OperatorRegistry {
    /// Looks up an operator by tag.
    ///
    /// # Errors
    ///
    /// `InvalidOperator` for an unknown tag.
    pub fn lookup(tag: &str) -> QueryResult<Operator> {
        tag.parse()
    }

    /// Returns true if `tag` names an operator
    pub fn is_valid(tag: &str) -> bool {
        Self::lookup(tag).is_ok()
    }

    /// Returns the predicate for an operator
    pub fn predicate(op: Operator) -> MatchFn {
        match op {
            Operator::Eq => eq_match,
            Operator::NotEq => not_eq_match,
            Operator::Gt => gt_match,
            Operator::Gte => gte_match,
            Operator::Lt => lt_match,
            Operator::Lte => lte_match,
            Operator::Contains => contains_match,
            Operator::StartsWith => starts_with_match,
            Operator::EndsWith => ends_with_match,
            Operator::InArray => in_array_match,
            Operator::InArrayInversed => in_array_inversed_match,
            Operator::ArrayMatch => array_match,
            Operator::GtDate => gt_date_match,
            Operator::GteDate => gte_date_match,
            Operator::LtDate => lt_date_match,
            Operator::LteDate => lte_date_match,
            Operator::EqualsDate => equals_date_match,
        }
    }

    /// Evaluates an operator
    pub fn matches(op: Operator, value: &Value, to_compare: &Value, format: &DateFormat) -> bool {
        Self::predicate(op)(value, to_compare, format)
    }
}

/// Strict equality: same type and same value
fn eq_match(value: &Value, to_compare: &Value, _: &DateFormat) -> bool {
    value == to_compare
}

fn not_eq_match(value: &Value, to_compare: &Value, _: &DateFormat) -> bool {
    value != to_compare
}

fn gt_match(value: &Value, to_compare: &Value, _: &DateFormat) -> bool {
    compare_ordered(value, to_compare) == Some(Ordering::Greater)
}

fn gte_match(value: &Value, to_compare: &Value, _: &DateFormat) -> bool {
    matches!(
        compare_ordered(value, to_compare),
        Some(Ordering::Greater | Ordering::Equal)
    )
}

fn lt_match(value: &Value, to_compare: &Value, _: &DateFormat) -> bool {
    compare_ordered(value, to_compare) == Some(Ordering::Less)
}

fn lte_match(value: &Value, to_compare: &Value, _: &DateFormat) -> bool {
    matches!(
        compare_ordered(value, to_compare),
        Some(Ordering::Less | Ordering::Equal)
    )
}

/// Case-insensitive substring test
fn contains_match(value: &Value, to_compare: &Value, _: &DateFormat) -> bool {
    match (stringify(value), stringify(to_compare)) {
        (Some(haystack), Some(needle)) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        _ => false,
    }
}

/// Case-sensitive byte prefix test
fn starts_with_match(value: &Value, to_compare: &Value, _: &DateFormat) -> bool {
    match (stringify(value), stringify(to_compare)) {
        (Some(s), Some(prefix)) => s.as_bytes().starts_with(prefix.as_bytes()),
        _ => false,
    }
}

/// Case-sensitive byte suffix test
fn ends_with_match(value: &Value, to_compare: &Value, _: &DateFormat) -> bool {
    match (stringify(value), stringify(to_compare)) {
        (Some(s), Some(suffix)) => s.as_bytes().ends_with(suffix.as_bytes()),
        _ => false,
    }
}

/// `value` is a member of the `to_compare` sequence
fn in_array_match(value: &Value, to_compare: &Value, _: &DateFormat) -> bool {
    members(to_compare).contains(&value)
}

/// `to_compare` is a member of the `value` sequence
fn in_array_inversed_match(value: &Value, to_compare: &Value, _: &DateFormat) -> bool {
    members(value).contains(&to_compare)
}

/// Both sequences share at least one element
fn array_match(value: &Value, to_compare: &Value, _: &DateFormat) -> bool {
    let wanted = members(to_compare);
    members(value).iter().any(|item| wanted.contains(item))
}

fn gt_date_match(value: &Value, to_compare: &Value, format: &DateFormat) -> bool {
    compare_dates(value, to_compare, format) == Some(Ordering::Greater)
}

fn gte_date_match(value: &Value, to_compare: &Value, format: &DateFormat) -> bool {
    matches!(
        compare_dates(value, to_compare, format),
        Some(Ordering::Greater | Ordering::Equal)
    )
}

fn lt_date_match(value: &Value, to_compare: &Value, format: &DateFormat) -> bool {
    compare_dates(value, to_compare, format) == Some(Ordering::Less)
}

fn lte_date_match(value: &Value, to_compare: &Value, format: &DateFormat) -> bool {
    matches!(
        compare_dates(value, to_compare, format),
        Some(Ordering::Less | Ordering::Equal)
    )
}

fn equals_date_match(value: &Value, to_compare: &Value, format: &DateFormat) -> bool {
    compare_dates(value, to_compare, format) == Some(Ordering::Equal)
}

/// Orders two values using the native ordering of their types.
///
/// - number/number: numeric
/// - numeric string/numeric string: numeric
/// - string/string: lexicographic
/// - number/numeric string: numeric
/// - bool/bool: false < true
///
/// Any other combination is unordered.
pub(crate) fn compare_ordered(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(xi), Some(yi)) = (x.as_i64(), y.as_i64()) {
                return Some(xi.cmp(&yi));
            }
            x.as_f64()?.partial_cmp(&y.as_f64()?)
        }
        (Value::String(x), Value::String(y)) => match (numeric_str(x), numeric_str(y)) {
            (Some(xf), Some(yf)) => xf.partial_cmp(&yf),
            _ => Some(x.cmp(y)),
        },
        (Value::Number(x), Value::String(y)) => x.as_f64()?.partial_cmp(&numeric_str(y)?),
        (Value::String(x), Value::Number(y)) => numeric_str(x)?.partial_cmp(&y.as_f64()?),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Numeric value of a string such as `"10"` or `" 2.5 "`
pub(crate) fn numeric_str(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

fn compare_dates(a: &Value, b: &Value, format: &DateFormat) -> Option<Ordering> {
    let a = format.parse(a)?;
    let b = format.parse(b)?;
    Some(a.cmp(&b))
}

/// String form of a scalar; `None` for null, sequences and mappings
fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Members of a value seen as a sequence: a sequence's items, nothing for
/// null, the value itself otherwise.
fn members(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(op: Operator, value: Value, to_compare: Value) -> bool {
        OperatorRegistry::matches(op, &value, &to_compare, &DateFormat::new("Y-m-d"))
    }

    #[test]
    fn test_lookup() {
        assert_eq!(OperatorRegistry::lookup(">=").unwrap(), Operator::Gte);
        assert!(OperatorRegistry::is_valid("CONTAINS"));
        assert!(!OperatorRegistry::is_valid("LIKE"));
    }

    #[test]
    fn test_strict_equality() {
        assert!(check(Operator::Eq, json!("Ervin Howell"), json!("Ervin Howell")));
        assert!(!check(Operator::Eq, json!(123), json!("123")));
        assert!(check(Operator::NotEq, json!(123), json!("123")));
        assert!(check(Operator::Eq, json!(null), json!(null)));
    }

    #[test]
    fn test_ordered_comparisons() {
        assert!(check(Operator::Gt, json!(4), json!(3)));
        assert!(!check(Operator::Gt, json!(3), json!(3)));
        assert!(check(Operator::Gte, json!(3), json!(3)));
        assert!(check(Operator::Lt, json!(2.5), json!(3)));
        assert!(check(Operator::Lte, json!("abc"), json!("abd")));
    }

    #[test]
    fn test_numeric_string_ordering() {
        assert!(check(Operator::Gt, json!(10), json!("3")));
        assert!(check(Operator::Lt, json!("2"), json!(3)));
        assert!(!check(Operator::Gt, json!(10), json!("three")));
    }

    #[test]
    fn test_two_numeric_strings_compare_numerically() {
        assert!(check(Operator::Gt, json!("10"), json!("9")));
        assert!(check(Operator::Lt, json!("9"), json!("10")));
        assert!(check(Operator::Gte, json!("2.50"), json!("2.5")));
        // Falls back to lexicographic when either side is not a number
        assert!(!check(Operator::Gt, json!("10"), json!("9a")));
    }

    #[test]
    fn test_mixed_types_unordered() {
        assert!(!check(Operator::Gt, json!(true), json!(0)));
        assert!(!check(Operator::Lt, json!(null), json!(1)));
        assert!(!check(Operator::Gte, json!([1]), json!([1])));
    }

    #[test]
    fn test_contains_case_insensitive() {
        assert!(check(Operator::Contains, json!("Clementine Bauch"), json!("clement")));
        assert!(!check(Operator::Contains, json!("Ervin Howell"), json!("clement")));
        assert!(check(Operator::Contains, json!(12345), json!("234")));
        assert!(!check(Operator::Contains, json!(null), json!("")));
    }

    #[test]
    fn test_prefix_suffix_case_sensitive() {
        assert!(check(Operator::StartsWith, json!("Leanne Graham"), json!("Lea")));
        assert!(!check(Operator::StartsWith, json!("Leanne Graham"), json!("lea")));
        assert!(check(Operator::EndsWith, json!("Leanne Graham"), json!("ham")));
        assert!(!check(Operator::EndsWith, json!("Leanne Graham"), json!("HAM")));
        assert!(!check(Operator::EndsWith, json!("am"), json!("Graham")));
    }

    #[test]
    fn test_in_array() {
        let names = json!(["Leanne Graham", "Ervin Howell"]);
        assert!(check(Operator::InArray, json!("Ervin Howell"), names.clone()));
        assert!(!check(Operator::InArray, json!("Clementine Bauch"), names));
    }

    #[test]
    fn test_in_array_inversed() {
        let tags = json!(["pear", "pinapple"]);
        assert!(check(Operator::InArrayInversed, tags.clone(), json!("pinapple")));
        assert!(!check(Operator::InArrayInversed, tags, json!("apple")));
    }

    #[test]
    fn test_array_match() {
        assert!(check(
            Operator::ArrayMatch,
            json!(["apple-pie", "cherry"]),
            json!(["pear-pie", "apple-pie"])
        ));
        assert!(!check(
            Operator::ArrayMatch,
            json!(["cherry"]),
            json!(["pear-pie", "apple-pie"])
        ));
        assert!(!check(Operator::ArrayMatch, json!([]), json!(["x"])));
    }

    #[test]
    fn test_date_operators() {
        assert!(check(Operator::GtDate, json!("2017-05-01"), json!("2017-04-30")));
        assert!(check(Operator::GteDate, json!("2017-05-01"), json!("2017-05-01")));
        assert!(check(Operator::LtDate, json!("2016-12-31"), json!("2017-01-01")));
        assert!(check(Operator::LteDate, json!("2017-01-01"), json!("2017-01-01")));
        assert!(check(Operator::EqualsDate, json!("2017-01-01"), json!("2017-01-01")));
    }

    #[test]
    fn test_date_with_custom_format() {
        let format = DateFormat::new("d/m/Y");
        assert!(OperatorRegistry::matches(
            Operator::GtDate,
            &json!("01/02/2018"),
            &json!("31/12/2017"),
            &format
        ));
    }

    #[test]
    fn test_unparseable_dates_never_match() {
        assert!(!check(Operator::EqualsDate, json!("soon"), json!("soon")));
        assert!(!check(Operator::LtDate, json!("2017-01-01"), json!(42)));
    }
}
