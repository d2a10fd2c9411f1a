//! Nested key resolution
//!
//! Walks a dotted path one segment at a time, narrowing into the child
//! mapping at each step.

use serde_json::{Map, Value};

use crate::query::{KeyPath, QueryError, QueryResult};

/// Resolves key paths against records
pub struct KeyResolver;

impl KeyResolver {
    /// Resolves `path` against `record`.
    ///
    /// # Errors
    ///
    /// `InvalidKey` naming the first segment absent from the current level.
    /// A segment below a non-mapping value is absent.
    pub fn resolve<'a>(path: &KeyPath, record: &'a Map<String, Value>) -> QueryResult<&'a Value> {
        Self::resolve_str(path.path(), record)
    }

    /// Resolves a raw dotted path
    pub fn resolve_str<'a>(path: &str, record: &'a Map<String, Value>) -> QueryResult<&'a Value> {
        let mut segments = path.split(crate::query::KEY_SEPARATOR);
        // split always yields at least one segment
        let first = segments.next().unwrap_or(path);
        let mut current = record
            .get(first)
            .ok_or_else(|| QueryError::InvalidKey(first.to_string()))?;

        for segment in segments {
            current = current
                .as_object()
                .and_then(|map| map.get(segment))
                .ok_or_else(|| QueryError::InvalidKey(segment.to_string()))?;
        }

        Ok(current)
    }
}
