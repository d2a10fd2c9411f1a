//! Query description for arrayquery
//!
//! Criteria, sort, limit and join specifications, the error taxonomy, the
//! JSON request format and explain output. Nothing here touches data;
//! evaluation lives in `executor`.

mod ast;
mod errors;
mod explain;
mod request;

pub use ast::{
    Criterion, JoinSpec, KeyPath, LimitSpec, Operator, SortOrder, SortSpec, ALIAS_DELIMITER,
    DEFAULT_DATE_FORMAT, KEY_SEPARATOR,
};
pub use errors::{QueryError, QueryResult};
pub use explain::ExplainPlan;
pub use request::{CriterionRequest, JoinRequest, LimitRequest, QueryRequest, SortRequest};
