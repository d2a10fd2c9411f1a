//! Query configuration
//!
//! Loaded from a JSON file or built in code. Every field has a default, so
//! `{}` is a valid configuration file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::executor::DateFormat;
use crate::query::{QueryError, QueryResult, DEFAULT_DATE_FORMAT};

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

/// Configuration for a query builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Accept an empty input collection instead of failing with
    /// `EmptyCollection` (default: false)
    #[serde(default)]
    pub allow_empty: bool,

    /// Date format for date criteria and date sorts that name none
    /// (default: "Y-m-d")
    #[serde(default = "default_date_format")]
    pub default_date_format: String,

    /// Sort before applying the limit (default: false, limit runs first)
    #[serde(default)]
    pub sort_before_limit: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            allow_empty: false,
            default_date_format: default_date_format(),
            sort_before_limit: false,
        }
    }
}

impl QueryConfig {
    /// Configuration that treats an empty collection as valid
    pub fn permissive() -> Self {
        Self {
            allow_empty: true,
            ..Self::default()
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> QueryResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            QueryError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration from JSON text
    pub fn from_json(text: &str) -> QueryResult<Self> {
        let config: QueryConfig = serde_json::from_str(text)
            .map_err(|e| QueryError::InvalidConfig(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> QueryResult<()> {
        if self.default_date_format.trim().is_empty() {
            return Err(QueryError::InvalidConfig(
                "default_date_format must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// The default date format, translated
    pub fn date_format(&self) -> DateFormat {
        DateFormat::new(&self.default_date_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = QueryConfig::default();
        assert!(!config.allow_empty);
        assert_eq!(config.default_date_format, "Y-m-d");
        assert!(!config.sort_before_limit);
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(QueryConfig::from_json("{}").unwrap(), QueryConfig::default());
    }

    #[test]
    fn test_permissive() {
        assert!(QueryConfig::permissive().allow_empty);
    }

    #[test]
    fn test_rejects_empty_date_format() {
        let err = QueryConfig::from_json(r#"{"default_date_format": " "}"#).unwrap_err();
        assert_eq!(err.code(), "ARRAYQUERY_INVALID_CONFIG");
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(QueryConfig::from_json("{not json").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"allow_empty": true, "default_date_format": "d/m/Y", "sort_before_limit": true}}"#
        )
        .unwrap();

        let config = QueryConfig::load(file.path()).unwrap();
        assert!(config.allow_empty);
        assert!(config.sort_before_limit);
        assert_eq!(config.date_format().pattern(), "%d/%m/%Y");
    }

    #[test]
    fn test_load_missing_file() {
        let err = QueryConfig::load(Path::new("/nonexistent/arrayquery.json")).unwrap_err();
        assert!(matches!(err, QueryError::InvalidConfig(_)));
    }
}
