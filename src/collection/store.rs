//! Keyed, shape-checked record collection

use std::collections::HashMap;

use super::record::{ElementKey, Record};
use super::shape::{ConsistencyChecker, Shape};
use crate::query::{QueryError, QueryResult};

/// Ordered sequence of records keyed by insertion key.
///
/// Invariants:
/// - every stored record has `shape` (when non-empty)
/// - `positions` maps each key to its index in `entries`
#[derive(Debug, Clone, Default)]
pub struct Collection {
    entries: Vec<(ElementKey, Record)>,
    positions: HashMap<ElementKey, usize>,
    shape: Option<Shape>,
}

impl Collection {
    /// Builds a collection with positional keys `0..n`.
    ///
    /// # Errors
    ///
    /// `NotConsistentData` if any record deviates from the first one's shape.
    pub fn from_records(records: Vec<Record>) -> QueryResult<Self> {
        let shape = ConsistencyChecker::check(&records)?;

        let entries: Vec<(ElementKey, Record)> = records
            .into_iter()
            .enumerate()
            .map(|(i, r)| (ElementKey::Index(i), r))
            .collect();
        let positions = (0..entries.len()).map(|i| (ElementKey::Index(i), i)).collect();

        Ok(Self {
            entries,
            positions,
            shape,
        })
    }

    /// Builds a collection with explicit keys. A repeated key keeps the
    /// position of its first occurrence and the value of its last.
    pub fn from_keyed(entries: Vec<(ElementKey, Record)>) -> QueryResult<Self> {
        let mut positions: HashMap<ElementKey, usize> = HashMap::with_capacity(entries.len());
        let mut deduped: Vec<(ElementKey, Record)> = Vec::with_capacity(entries.len());
        for (key, record) in entries {
            match positions.get(&key) {
                Some(&pos) => deduped[pos].1 = record,
                None => {
                    positions.insert(key.clone(), deduped.len());
                    deduped.push((key, record));
                }
            }
        }

        let shape = ConsistencyChecker::check_entries(deduped.iter().map(|(_, r)| r))?;

        Ok(Self {
            entries: deduped,
            positions,
            shape,
        })
    }

    /// Inserts a record under `key` after checking its shape.
    ///
    /// An existing key is overwritten in place; a new key is appended.
    /// On failure the collection is unchanged.
    pub fn insert(&mut self, key: ElementKey, record: Record) -> QueryResult<()> {
        match &self.shape {
            Some(shape) => ConsistencyChecker::check_element(&record, shape)?,
            None => self.shape = Some(Shape::of(&record)),
        }

        match self.positions.get(&key) {
            Some(&pos) => self.entries[pos].1 = record,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, record));
            }
        }
        Ok(())
    }

    /// Removes the record stored under `key`.
    ///
    /// # Errors
    ///
    /// `NotExistingElement` if no record has that key.
    pub fn remove(&mut self, key: &ElementKey) -> QueryResult<Record> {
        let pos = self
            .positions
            .remove(key)
            .ok_or_else(|| QueryError::NotExistingElement(key.to_string()))?;

        let (_, record) = self.entries.remove(pos);
        for (k, _) in &self.entries[pos..] {
            if let Some(p) = self.positions.get_mut(k) {
                *p -= 1;
            }
        }
        if self.entries.is_empty() {
            self.shape = None;
        }
        Ok(record)
    }

    /// Returns the record stored under `key`
    pub fn get(&self, key: &ElementKey) -> Option<&Record> {
        self.positions.get(key).map(|&pos| &self.entries[pos].1)
    }

    /// Returns true if a record is stored under `key`
    pub fn contains_key(&self, key: &ElementKey) -> bool {
        self.positions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shape shared by every record, `None` when empty
    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ElementKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter().map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ElementKey, &Record)> {
        self.entries.iter().map(|(k, r)| (k, r))
    }
}
