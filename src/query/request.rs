//! JSON query requests
//!
//! A whole query described as a JSON document:
//!
//! ```json
//! {
//!   "criteria": [{"key": "id", "value": 3, "operator": ">"}],
//!   "sorted_by": {"key": "name", "order": "ASC"},
//!   "limit": {"offset": 0, "length": 5},
//!   "join": [{"array": {"id": 3}, "name": "category",
//!             "parent_key": "id_category", "foreign_key": "id"}]
//! }
//! ```
//!
//! Applying a request goes through the same validating builder methods as
//! the fluent API.

use serde::Deserialize;
use serde_json::Value;

use super::errors::{QueryError, QueryResult};
use crate::builder::QueryBuilder;
use crate::collection::normalize_value;

fn default_operator() -> String {
    "=".to_string()
}

fn default_order() -> String {
    "ASC".to_string()
}

/// One criterion of a request
#[derive(Debug, Clone, Deserialize)]
pub struct CriterionRequest {
    pub key: String,
    pub value: Value,
    #[serde(default = "default_operator")]
    pub operator: String,
    #[serde(default)]
    pub date_format: Option<String>,
}

/// Sort part of a request
#[derive(Debug, Clone, Deserialize)]
pub struct SortRequest {
    pub key: String,
    #[serde(default = "default_order")]
    pub order: String,
    #[serde(default, alias = "format")]
    pub date_format: Option<String>,
}

/// Limit part of a request. Values stay raw so non-integers can be
/// reported as invalid limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitRequest {
    pub offset: Value,
    pub length: Value,
}

/// Join part of a request
#[derive(Debug, Clone, Deserialize)]
pub struct JoinRequest {
    #[serde(alias = "side")]
    pub array: Value,
    #[serde(alias = "attach_as")]
    pub name: String,
    pub parent_key: String,
    pub foreign_key: String,
}

/// A complete query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub criteria: Vec<CriterionRequest>,
    #[serde(default)]
    pub sorted_by: Option<SortRequest>,
    #[serde(default)]
    pub limit: Option<LimitRequest>,
    #[serde(default)]
    pub join: Vec<JoinRequest>,
}

impl QueryRequest {
    /// Parses a request from JSON text
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Configures `builder` with this request.
    ///
    /// Stops at the first invalid part.
    pub fn apply_to(&self, builder: &mut QueryBuilder) -> QueryResult<()> {
        for join in &self.join {
            let side = normalize_value(join.array.clone())?;
            builder.join(side, &join.name, &join.parent_key, &join.foreign_key);
        }

        for c in &self.criteria {
            match &c.date_format {
                Some(format) => {
                    builder.add_date_criterion(&c.key, c.value.clone(), &c.operator, format)?;
                }
                None => {
                    builder.add_criterion(&c.key, c.value.clone(), &c.operator)?;
                }
            }
        }

        if let Some(sort) = &self.sorted_by {
            match &sort.date_format {
                Some(format) => builder.sorted_by_date(&sort.key, &sort.order, format)?,
                None => builder.sorted_by(&sort.key, &sort.order)?,
            };
        }

        if let Some(limit) = &self.limit {
            let offset = integer_limit(&limit.offset)?;
            let length = integer_limit(&limit.length)?;
            builder.limit(offset, length)?;
        }

        Ok(())
    }
}

fn integer_limit(value: &Value) -> QueryResult<usize> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            let shown = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            QueryError::invalid_limits(format!("{} must be an integer.", shown))
        })
}
