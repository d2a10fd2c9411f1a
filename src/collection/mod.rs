//! Record collections for arrayquery
//!
//! A collection owns the queried records and enforces the shape
//! consistency invariant: every record has the same recursive key set.
//!
//! # Lifecycle
//!
//! - Built once from an input sequence (validated as a whole)
//! - Mutated only by explicit insert/remove (each re-validated)
//! - Never mutated by query evaluation

mod record;
mod shape;
mod store;

pub use record::{json_type_name, normalize, normalize_value, to_plain, ElementKey, Record};
pub use shape::{ConsistencyChecker, Shape};
pub use store::Collection;
