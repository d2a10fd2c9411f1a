//! Query error types
//!
//! Error codes:
//! - ARRAYQUERY_EMPTY_COLLECTION
//! - ARRAYQUERY_NOT_CONSISTENT_DATA
//! - ARRAYQUERY_INVALID_OPERATOR
//! - ARRAYQUERY_INVALID_SORT_ORDER
//! - ARRAYQUERY_INVALID_LIMITS
//! - ARRAYQUERY_INVALID_KEY
//! - ARRAYQUERY_NOT_EXISTING_ELEMENT
//! - ARRAYQUERY_INVALID_RECORD
//! - ARRAYQUERY_INVALID_CONFIG
//!
//! Every error is a local validation failure raised by the call that
//! detects it. Nothing is retried and nothing is partially applied.

use thiserror::Error;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Query errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("{0}")]
    EmptyCollection(String),

    #[error("{0}")]
    NotConsistentData(String),

    #[error("{0} is not a valid operator.")]
    InvalidOperator(String),

    #[error("{0} is not a valid sorting operator.")]
    InvalidSortOrder(String),

    #[error("{0}")]
    InvalidLimits(String),

    #[error("{0} is not a valid key in the array.")]
    InvalidKey(String),

    #[error("{0} is not an existing element of the collection.")]
    NotExistingElement(String),

    #[error("{0}")]
    InvalidRecord(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl QueryError {
    /// Collection built from an empty input
    pub fn empty_collection() -> Self {
        QueryError::EmptyCollection("Empty array provided.".into())
    }

    /// Shape mismatch with a description of where it was found
    pub fn not_consistent(reason: impl Into<String>) -> Self {
        QueryError::NotConsistentData(reason.into())
    }

    /// Limits that fail validation
    pub fn invalid_limits(reason: impl Into<String>) -> Self {
        QueryError::InvalidLimits(reason.into())
    }

    /// Returns the stable string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::EmptyCollection(_) => "ARRAYQUERY_EMPTY_COLLECTION",
            QueryError::NotConsistentData(_) => "ARRAYQUERY_NOT_CONSISTENT_DATA",
            QueryError::InvalidOperator(_) => "ARRAYQUERY_INVALID_OPERATOR",
            QueryError::InvalidSortOrder(_) => "ARRAYQUERY_INVALID_SORT_ORDER",
            QueryError::InvalidLimits(_) => "ARRAYQUERY_INVALID_LIMITS",
            QueryError::InvalidKey(_) => "ARRAYQUERY_INVALID_KEY",
            QueryError::NotExistingElement(_) => "ARRAYQUERY_NOT_EXISTING_ELEMENT",
            QueryError::InvalidRecord(_) => "ARRAYQUERY_INVALID_RECORD",
            QueryError::InvalidConfig(_) => "ARRAYQUERY_INVALID_CONFIG",
        }
    }
}
