//! arrayquery - in-memory queries over collections of JSON records
//!
//! A collection is validated once for shape consistency, then queried
//! through a fluent builder: criteria (with nested keys and aliases),
//! one-to-one joins, a single sort and a single limit.

pub mod builder;
pub mod cli;
pub mod collection;
pub mod config;
pub mod executor;
pub mod observability;
pub mod query;

pub use builder::QueryBuilder;
pub use collection::{ElementKey, Record};
pub use config::QueryConfig;
pub use query::{QueryError, QueryResult};
