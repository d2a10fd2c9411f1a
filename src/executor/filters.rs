//! Criterion filtering and alias projection
//!
//! Each criterion narrows the surviving rows. When its key carries an alias
//! every survivor is then rewritten: the resolved value is stored under the
//! alias and the original top-level field is removed. The projection runs
//! before the next criterion is evaluated.

use serde_json::Value;

use super::dates::DateFormat;
use super::operators::OperatorRegistry;
use super::resolver::KeyResolver;
use crate::collection::Record;
use crate::query::{Criterion, QueryResult};

/// Evaluates criteria against records
pub struct CriterionFilter;

impl CriterionFilter {
    /// Checks if a record matches a single criterion.
    ///
    /// # Errors
    ///
    /// `InvalidKey` if the criterion key is absent from the record.
    pub fn matches(
        criterion: &Criterion,
        record: &Record,
        default_format: &DateFormat,
    ) -> QueryResult<bool> {
        let value = KeyResolver::resolve(&criterion.key, record)?;
        let custom;
        let format = match &criterion.date_format {
            Some(f) => {
                custom = DateFormat::new(f);
                &custom
            }
            None => default_format,
        };

        Ok(OperatorRegistry::matches(
            criterion.operator,
            value,
            &criterion.value,
            format,
        ))
    }

    /// Keeps the records matching `criterion`, then applies its alias.
    pub fn apply(
        criterion: &Criterion,
        records: Vec<Record>,
        default_format: &DateFormat,
    ) -> QueryResult<Vec<Record>> {
        let mut survivors = Vec::with_capacity(records.len());
        for record in records {
            if Self::matches(criterion, &record, default_format)? {
                survivors.push(record);
            }
        }

        if criterion.key.alias().is_some() {
            survivors = survivors
                .into_iter()
                .map(|record| Self::project_alias(criterion, record))
                .collect::<QueryResult<_>>()?;
        }

        Ok(survivors)
    }

    /// Applies every criterion in order
    pub fn apply_all(
        criteria: &[Criterion],
        records: Vec<Record>,
        default_format: &DateFormat,
    ) -> QueryResult<Vec<Record>> {
        criteria
            .iter()
            .try_fold(records, |rows, criterion| {
                Self::apply(criterion, rows, default_format)
            })
    }

    /// Rewrites one record for an aliased criterion.
    fn project_alias(criterion: &Criterion, mut record: Record) -> QueryResult<Record> {
        let Some(alias) = criterion.key.alias() else {
            return Ok(record);
        };

        let value: Value = KeyResolver::resolve(&criterion.key, &record)?.clone();
        record.remove(criterion.key.root());
        record.insert(alias.to_string(), value);
        Ok(record)
    }
}
