//! Pagination
//!
//! Returns the window `[offset, offset + length)`, truncated to the rows
//! that exist. Bounds are validated when the limit is set, not here.

use crate::collection::Record;
use crate::query::LimitSpec;

/// Applies a limit specification
pub struct ResultLimiter;

impl ResultLimiter {
    pub fn apply(records: Vec<Record>, spec: &LimitSpec) -> Vec<Record> {
        records
            .into_iter()
            .skip(spec.offset)
            .take(spec.length)
            .collect()
    }
}
