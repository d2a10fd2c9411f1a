//! CLI-specific error types

use std::io;

use thiserror::Error;

use crate::query::QueryError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Query(#[from] QueryError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Invalid input file or request
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "ARRAYQUERY_CLI_IO_ERROR",
            Self::Json(_) => "ARRAYQUERY_CLI_JSON_ERROR",
            Self::Query(e) => e.code(),
            Self::InvalidInput(_) => "ARRAYQUERY_CLI_INVALID_INPUT",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_keeps_code() {
        let err = CliError::from(QueryError::empty_collection());
        assert_eq!(err.code(), "ARRAYQUERY_EMPTY_COLLECTION");
        assert_eq!(err.to_string(), "Empty array provided.");
    }

    #[test]
    fn test_json_error_code() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CliError::from(parse);
        assert_eq!(err.code(), "ARRAYQUERY_CLI_JSON_ERROR");
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_invalid_input_display() {
        let err = CliError::invalid_input("empty request");
        assert_eq!(err.to_string(), "Invalid input: empty request");
    }
}
