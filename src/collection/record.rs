//! Record representation and input/output normalization
//!
//! A record is a string-keyed JSON map. Anything that serializes to a JSON
//! object can be turned into one; the query core never sees other shapes.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::query::{QueryError, QueryResult};

/// One element of a collection
pub type Record = Map<String, Value>;

/// Insertion key of a collection element.
///
/// Distinct from any field inside the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementKey {
    /// Positional key assigned when a collection is built from a sequence
    Index(usize),
    /// Explicit name
    Name(String),
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKey::Index(i) => write!(f, "{}", i),
            ElementKey::Name(n) => write!(f, "{}", n),
        }
    }
}

impl From<usize> for ElementKey {
    fn from(i: usize) -> Self {
        ElementKey::Index(i)
    }
}

impl From<&str> for ElementKey {
    fn from(s: &str) -> Self {
        ElementKey::Name(s.to_string())
    }
}

impl From<String> for ElementKey {
    fn from(s: String) -> Self {
        ElementKey::Name(s)
    }
}

/// Converts a decoded JSON value into a record.
///
/// Only JSON objects are records.
pub fn normalize_value(value: Value) -> QueryResult<Record> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(QueryError::InvalidRecord(format!(
            "expected a mapping, found {}",
            json_type_name(&other)
        ))),
    }
}

/// Flattens any serializable value (struct, map) into a record.
pub fn normalize<T: Serialize>(item: &T) -> QueryResult<Record> {
    let value = serde_json::to_value(item)
        .map_err(|e| QueryError::InvalidRecord(format!("cannot serialize record: {}", e)))?;
    normalize_value(value)
}

/// Output normalization.
///
/// A record is already made only of maps, sequences and scalars, so the
/// row is handed back as is.
pub fn to_plain(record: Record) -> Record {
    record
}

/// Returns the JSON type name of a value, for error messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct User {
        id: u32,
        name: String,
        company: Company,
    }

    #[derive(Serialize)]
    struct Company {
        name: String,
    }

    #[test]
    fn test_normalize_struct() {
        let user = User {
            id: 1,
            name: "Leanne Graham".into(),
            company: Company {
                name: "Romaguera-Crona".into(),
            },
        };

        let record = normalize(&user).unwrap();
        assert_eq!(record["id"], json!(1));
        assert_eq!(record["company"]["name"], json!("Romaguera-Crona"));
    }

    #[test]
    fn test_normalize_rejects_scalars() {
        let err = normalize_value(json!(42)).unwrap_err();
        assert_eq!(err.code(), "ARRAYQUERY_INVALID_RECORD");

        let err = normalize(&vec![1, 2, 3]).unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_element_key_display() {
        assert_eq!(ElementKey::from(3).to_string(), "3");
        assert_eq!(ElementKey::from("user-9").to_string(), "user-9");
    }

    #[test]
    fn test_to_plain_preserves_content() {
        let record = normalize_value(json!({"a": {"b": [1, {"c": null}]}})).unwrap();
        assert_eq!(to_plain(record.clone()), record);
    }
}
