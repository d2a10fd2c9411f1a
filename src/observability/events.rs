//! Observable events for arrayquery
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events in arrayquery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration loaded from file
    ConfigLoaded,
    /// Collection validated and owned by a builder
    CollectionCreated,
    /// Element inserted or overwritten
    ElementAdded,
    /// Element removed
    ElementRemoved,
    /// `get_results` finished
    QueryExecuted,
    /// Shape check rejected a collection or element
    ConsistencyViolation,
    /// Evaluation failed
    QueryFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CollectionCreated => "COLLECTION_CREATED",
            Event::ElementAdded => "ELEMENT_ADDED",
            Event::ElementRemoved => "ELEMENT_REMOVED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::ConsistencyViolation => "CONSISTENCY_VIOLATION",
            Event::QueryFailed => "QUERY_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConsistencyViolation => Severity::Warn,
            Event::QueryFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
