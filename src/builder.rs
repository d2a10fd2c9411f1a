//! Fluent query builder
//!
//! `QueryBuilder` owns a validated collection plus the query configuration
//! (criteria, one sort slot, one limit slot, joins). Results are computed
//! from scratch on every access; evaluation never mutates the collection.
//!
//! ```ignore
//! let mut query = QueryBuilder::create(users)?;
//! query
//!     .add_criterion("id", json!(3), ">")?
//!     .sorted_by("name", "ASC")?
//!     .limit(0, 5)?;
//! let rows = query.get_results()?;
//! ```

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use serde_json::Value;

use crate::collection::{normalize, normalize_value, to_plain, Collection, ElementKey, Record};
use crate::config::QueryConfig;
use crate::executor::{
    CriterionFilter, DateFormat, OperatorRegistry, RecordJoiner, ResultLimiter, ResultSorter,
};
use crate::observability::{log_event_with_fields, Event};
use crate::query::{
    Criterion, ExplainPlan, JoinSpec, KeyPath, LimitSpec, QueryError, QueryResult, SortOrder,
    SortSpec,
};

/// Row counts after each stage of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StageCounts {
    input: usize,
    joined: usize,
    filtered: usize,
    output: usize,
}

fn log_violation(e: QueryError) -> QueryError {
    let reason = e.to_string();
    log_event_with_fields(Event::ConsistencyViolation, &[("reason", reason.as_str())]);
    e
}

/// Query pipeline over an owned record collection
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    collection: Collection,
    criteria: Vec<Criterion>,
    sort: Option<SortSpec>,
    limit: Option<LimitSpec>,
    joins: Vec<JoinSpec>,
    config: QueryConfig,
}

impl QueryBuilder {
    /// Builds a query over decoded JSON values with the default config.
    ///
    /// # Errors
    ///
    /// - `InvalidRecord` if an item is not a JSON object
    /// - `EmptyCollection` if `items` is empty
    /// - `NotConsistentData` if the records do not share one shape
    pub fn create(items: Vec<Value>) -> QueryResult<Self> {
        let records = items
            .into_iter()
            .map(normalize_value)
            .collect::<QueryResult<Vec<_>>>()?;
        Self::with_config(records, QueryConfig::default())
    }

    /// Builds a query over records with the default config
    pub fn from_records(records: Vec<Record>) -> QueryResult<Self> {
        Self::with_config(records, QueryConfig::default())
    }

    /// Builds a query over any serializable items (structs, maps)
    pub fn from_serializable<T: Serialize>(items: &[T]) -> QueryResult<Self> {
        let records = items
            .iter()
            .map(normalize)
            .collect::<QueryResult<Vec<_>>>()?;
        Self::from_records(records)
    }

    /// Builds a query over records with positional keys `0..n`
    pub fn with_config(records: Vec<Record>, config: QueryConfig) -> QueryResult<Self> {
        Self::check_input(records.is_empty(), &config)?;
        let collection = Collection::from_records(records).map_err(log_violation)?;
        Ok(Self::over(collection, config))
    }

    /// Builds a query over records with explicit keys
    pub fn from_keyed(entries: Vec<(ElementKey, Record)>, config: QueryConfig) -> QueryResult<Self> {
        Self::check_input(entries.is_empty(), &config)?;
        let collection = Collection::from_keyed(entries).map_err(log_violation)?;
        Ok(Self::over(collection, config))
    }

    fn check_input(empty: bool, config: &QueryConfig) -> QueryResult<()> {
        config.validate()?;
        if empty && !config.allow_empty {
            return Err(QueryError::empty_collection());
        }
        Ok(())
    }

    fn over(collection: Collection, config: QueryConfig) -> Self {
        let size = collection.len().to_string();
        log_event_with_fields(Event::CollectionCreated, &[("records", size.as_str())]);

        Self {
            collection,
            criteria: Vec::new(),
            sort: None,
            limit: None,
            joins: Vec::new(),
            config,
        }
    }

    // =========================================================================
    // Query configuration
    // =========================================================================

    /// Appends a criterion.
    ///
    /// `key` may carry an alias (`"company.name as company_name"`). Date
    /// operators without a format use the configured default.
    ///
    /// # Errors
    ///
    /// `InvalidOperator` if `operator` is not a known tag.
    pub fn add_criterion(&mut self, key: &str, value: Value, operator: &str) -> QueryResult<&mut Self> {
        let operator = OperatorRegistry::lookup(operator)?;
        self.criteria.push(Criterion::new(key, operator, value));
        Ok(self)
    }

    /// Appends a criterion whose dates are parsed with `date_format`
    pub fn add_date_criterion(
        &mut self,
        key: &str,
        value: Value,
        operator: &str,
        date_format: &str,
    ) -> QueryResult<&mut Self> {
        let operator = OperatorRegistry::lookup(operator)?;
        self.criteria
            .push(Criterion::new(key, operator, value).with_date_format(date_format));
        Ok(self)
    }

    /// Sets the sort, replacing any previous one.
    ///
    /// # Errors
    ///
    /// `InvalidSortOrder` if `order` is not ASC, DESC, DATE_ASC or DATE_DESC.
    pub fn sorted_by(&mut self, key: &str, order: &str) -> QueryResult<&mut Self> {
        let order: SortOrder = order.parse()?;
        self.sort = Some(SortSpec {
            key: KeyPath::parse(key),
            order,
            date_format: None,
        });
        Ok(self)
    }

    /// Sets a sort whose keys are parsed as dates with `date_format`
    pub fn sorted_by_date(&mut self, key: &str, order: &str, date_format: &str) -> QueryResult<&mut Self> {
        let order: SortOrder = order.parse()?;
        self.sort = Some(SortSpec {
            key: KeyPath::parse(key),
            order,
            date_format: Some(date_format.to_string()),
        });
        Ok(self)
    }

    /// Sets the pagination window, replacing any previous one.
    ///
    /// Returns rows `[offset, offset + length)` of the filtered sequence.
    ///
    /// # Errors
    ///
    /// `InvalidLimits` if `offset > length` or `length` exceeds the
    /// collection size.
    pub fn limit(&mut self, offset: usize, length: usize) -> QueryResult<&mut Self> {
        if offset > length {
            return Err(QueryError::invalid_limits(format!(
                "{} must be an < than {}.",
                offset, length
            )));
        }
        if length > self.collection.len() {
            return Err(QueryError::invalid_limits(format!(
                "{} must be an > than array count.",
                length
            )));
        }
        self.limit = Some(LimitSpec { offset, length });
        Ok(self)
    }

    /// Appends a one-to-one join against `side`
    pub fn join(&mut self, side: Record, attach_as: &str, parent_key: &str, foreign_key: &str) -> &mut Self {
        self.joins.push(JoinSpec {
            side,
            attach_as: attach_as.to_string(),
            parent_key: parent_key.to_string(),
            foreign_key: foreign_key.to_string(),
        });
        self
    }

    // =========================================================================
    // Collection mutation
    // =========================================================================

    /// Inserts `record` under `key`, overwriting an existing key.
    ///
    /// # Errors
    ///
    /// `NotConsistentData` if the record's shape differs from the
    /// collection's. The collection is left unchanged.
    pub fn add_element(&mut self, record: Record, key: impl Into<ElementKey>) -> QueryResult<&mut Self> {
        let key = key.into();
        let shown = key.to_string();
        self.collection.insert(key, record).map_err(log_violation)?;
        log_event_with_fields(Event::ElementAdded, &[("key", shown.as_str())]);
        Ok(self)
    }

    /// Removes the element stored under `key`.
    ///
    /// # Errors
    ///
    /// `NotExistingElement` if no element has that key.
    pub fn remove_element(&mut self, key: impl Into<ElementKey>) -> QueryResult<&mut Self> {
        let key = key.into();
        self.collection.remove(&key)?;
        let shown = key.to_string();
        log_event_with_fields(Event::ElementRemoved, &[("key", shown.as_str())]);
        Ok(self)
    }

    // =========================================================================
    // Results
    // =========================================================================

    /// Runs the query.
    ///
    /// # Errors
    ///
    /// `InvalidKey` if a criterion or sort key is absent from a record.
    pub fn get_results(&self) -> QueryResult<Vec<Record>> {
        match self.run() {
            Ok((rows, counts)) => {
                let input = counts.input.to_string();
                let joined = counts.joined.to_string();
                let filtered = counts.filtered.to_string();
                let results = counts.output.to_string();
                log_event_with_fields(
                    Event::QueryExecuted,
                    &[
                        ("input", input.as_str()),
                        ("joined", joined.as_str()),
                        ("filtered", filtered.as_str()),
                        ("results", results.as_str()),
                    ],
                );
                Ok(rows)
            }
            Err(e) => {
                let message = e.to_string();
                log_event_with_fields(
                    Event::QueryFailed,
                    &[("code", e.code()), ("message", message.as_str())],
                );
                Err(e)
            }
        }
    }

    fn run(&self) -> QueryResult<(Vec<Record>, StageCounts)> {
        let default_format = self.config.date_format();
        let rows: Vec<Record> = self.collection.records().cloned().collect();
        let input = rows.len();

        let rows = RecordJoiner::apply(rows, &self.joins);
        let joined = rows.len();

        let mut rows = CriterionFilter::apply_all(&self.criteria, rows, &default_format)?;
        let filtered = rows.len();

        if self.config.sort_before_limit {
            rows = self.apply_sort(rows, &default_format)?;
            rows = self.apply_limit(rows);
        } else {
            rows = self.apply_limit(rows);
            rows = self.apply_sort(rows, &default_format)?;
        }

        let rows: Vec<Record> = rows.into_iter().map(to_plain).collect();
        let counts = StageCounts {
            input,
            joined,
            filtered,
            output: rows.len(),
        };
        Ok((rows, counts))
    }

    fn apply_limit(&self, rows: Vec<Record>) -> Vec<Record> {
        match &self.limit {
            Some(spec) => ResultLimiter::apply(rows, spec),
            None => rows,
        }
    }

    fn apply_sort(
        &self,
        rows: Vec<Record>,
        default_format: &DateFormat,
    ) -> QueryResult<Vec<Record>> {
        match &self.sort {
            Some(spec) => ResultSorter::sort(rows, spec, default_format),
            None => Ok(rows),
        }
    }

    /// Result at position `n`, or an empty record when out of range
    pub fn get_result(&self, n: usize) -> QueryResult<Record> {
        Ok(self.get_results()?.into_iter().nth(n).unwrap_or_default())
    }

    /// First result, or an empty record
    pub fn get_first_result(&self) -> QueryResult<Record> {
        self.get_result(0)
    }

    /// Last result, or an empty record
    pub fn get_last_result(&self) -> QueryResult<Record> {
        Ok(self.get_results()?.pop().unwrap_or_default())
    }

    /// Results in random order
    pub fn get_shuffled_results(&self) -> QueryResult<Vec<Record>> {
        self.get_shuffled_results_with(&mut rand::thread_rng())
    }

    /// Results shuffled with the given random source
    pub fn get_shuffled_results_with<R: Rng + ?Sized>(&self, rng: &mut R) -> QueryResult<Vec<Record>> {
        let mut rows = self.get_results()?;
        rows.shuffle(rng);
        Ok(rows)
    }

    /// Number of results
    pub fn get_count(&self) -> QueryResult<usize> {
        Ok(self.get_results()?.len())
    }

    /// Describes the configured stages without running them
    pub fn explain(&self) -> ExplainPlan {
        ExplainPlan::new(
            self.collection.len(),
            &self.joins,
            &self.criteria,
            self.limit.as_ref(),
            self.sort.as_ref(),
            self.config.sort_before_limit,
        )
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }
}
