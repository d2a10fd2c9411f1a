//! One-to-one lookup joins
//!
//! Each join attaches a fixed side record to every row whose parent key
//! equals the side record's foreign key. Rows that do not match are dropped.
//! Joins apply in order, each narrowing the rows further.

use serde_json::Value;

use crate::collection::Record;
use crate::query::JoinSpec;

/// Applies join specifications to records
pub struct RecordJoiner;

impl RecordJoiner {
    /// Applies every join in order. No joins is a pass-through.
    pub fn apply(records: Vec<Record>, joins: &[JoinSpec]) -> Vec<Record> {
        joins
            .iter()
            .fold(records, |rows, join| Self::apply_one(rows, join))
    }

    fn apply_one(records: Vec<Record>, join: &JoinSpec) -> Vec<Record> {
        // A side record without the foreign key matches nothing
        let Some(foreign_value) = join.side.get(&join.foreign_key) else {
            return Vec::new();
        };

        records
            .into_iter()
            .filter_map(|mut record| {
                if record.get(&join.parent_key) == Some(foreign_value) {
                    record.insert(join.attach_as.clone(), Value::Object(join.side.clone()));
                    Some(record)
                } else {
                    None
                }
            })
            .collect()
    }
}
