//! Query evaluation stages for arrayquery
//!
//! # Execution Flow (strict order)
//!
//! 1. Join side records onto the collection rows
//! 2. Filter by each criterion in order, projecting its alias before the
//!    next criterion runs
//! 3. Apply limit
//! 4. Apply sort
//! 5. Normalize every surviving record
//!
//! Limit running before sort is the established order. `QueryConfig`
//! can swap steps 3 and 4.
//!
//! Every stage is a synchronous pass over an owned `Vec<Record>`; nothing
//! is cached between runs.

mod dates;
mod filters;
mod joiner;
mod limiter;
mod operators;
mod resolver;
mod sorter;

pub use dates::DateFormat;
pub use filters::CriterionFilter;
pub use joiner::RecordJoiner;
pub use limiter::ResultLimiter;
pub use operators::{MatchFn, OperatorRegistry};
pub use resolver::KeyResolver;
pub use sorter::ResultSorter;
