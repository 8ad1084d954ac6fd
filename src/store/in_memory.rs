//! Store - BTreeMap-backed record engine.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::Value;

use super::StoreError;
use crate::matcher::{is_match, value_matches};
use crate::record::{with_id, without_id, Record, RecordId, ID_FIELD};

/// In-memory record store.
///
/// Ids are handed out from a per-store counter that starts at 1 and is
/// never rewound, so an id is never reused even after removal or `clear`.
/// Because ids only grow, engine key order is insertion order. The counter
/// is `None` once `RecordId::MAX` has been assigned.
#[derive(Debug, Clone)]
pub struct Store {
    counter: Option<RecordId>,
    engine: BTreeMap<RecordId, Record>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            counter: Some(1),
            engine: BTreeMap::new(),
        }
    }

    /// Wrap a caller-supplied engine.
    ///
    /// Any `id` field inside the supplied values is dropped, and the counter
    /// resumes after the highest existing id. An engine already holding
    /// `RecordId::MAX` leaves no ids to assign, so every later insert fails
    /// with [`StoreError::IdsExhausted`].
    pub fn with_engine(engine: BTreeMap<RecordId, Record>) -> Self {
        let engine: BTreeMap<RecordId, Record> = engine
            .into_iter()
            .map(|(id, mut record)| {
                record.remove(ID_FIELD);
                (id, record)
            })
            .collect();
        let counter = match engine.keys().next_back() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        };

        Self { counter, engine }
    }

    /// Rebuild a store from a snapshot produced by [`Store::serialize`].
    pub fn from_snapshot(snapshot: BTreeMap<RecordId, Record>) -> Self {
        Self::with_engine(snapshot)
    }

    /// Insert a record, assigning it the next id.
    pub fn insert(&mut self, mut record: Record) -> Result<Record, StoreError> {
        let Some(id) = self.counter else {
            tracing::warn!("record ids exhausted");
            return Err(StoreError::IdsExhausted);
        };
        self.counter = id.checked_add(1);

        record.remove(ID_FIELD);
        let out = with_id(id, &record);
        self.engine.insert(id, record);

        tracing::debug!(id, "record inserted");
        Ok(out)
    }

    /// Get a record by id.
    pub fn get(&self, id: RecordId) -> Option<Record> {
        self.engine.get(&id).map(|record| with_id(id, record))
    }

    /// Find the first record matching `pattern`, in insertion order.
    pub fn find_one(&self, pattern: &Record) -> Option<Record> {
        self.matching(pattern)
            .next()
            .map(|(id, record)| with_id(id, record))
    }

    /// Find every record matching `pattern`, in insertion order.
    pub fn find_many(&self, pattern: &Record) -> Vec<Record> {
        self.matching(pattern)
            .map(|(id, record)| with_id(id, record))
            .collect()
    }

    /// Overwrite the record at `id` with `data`. This is a full replace,
    /// not a merge.
    pub fn replace(&mut self, id: RecordId, data: &Record) -> Result<Record, StoreError> {
        let stored = self.engine.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        *stored = without_id(data);

        tracing::debug!(id, "record replaced");
        Ok(with_id(id, stored))
    }

    /// Merge `update` over the first record matching `pattern`.
    pub fn update_one(&mut self, pattern: &Record, update: &Record) -> Option<Record> {
        let id = self.matching(pattern).next().map(|(id, _)| id)?;
        self.merge(id, update);
        self.get(id)
    }

    /// Merge `update` over every record matching `pattern`.
    pub fn update_many(&mut self, pattern: &Record, update: &Record) -> Vec<Record> {
        let ids = self.matching_ids(pattern);
        ids.into_iter()
            .filter_map(|id| {
                self.merge(id, update);
                self.get(id)
            })
            .collect()
    }

    /// Remove and return the first record matching `pattern`.
    pub fn remove_one(&mut self, pattern: &Record) -> Option<Record> {
        let id = self.matching(pattern).next().map(|(id, _)| id)?;
        let record = self.engine.remove(&id)?;

        tracing::debug!(id, "record removed");
        Some(with_id(id, &record))
    }

    /// Remove and return every record matching `pattern`.
    pub fn remove_many(&mut self, pattern: &Record) -> Vec<Record> {
        let removed: Vec<Record> = self
            .matching_ids(pattern)
            .into_iter()
            .filter_map(|id| self.engine.remove(&id).map(|record| with_id(id, &record)))
            .collect();

        tracing::debug!(count = removed.len(), "records removed");
        removed
    }

    /// Remove every record. The id counter is not reset.
    pub fn clear(&mut self) -> &mut Self {
        self.engine.clear();
        tracing::debug!(next_id = ?self.counter, "store cleared");
        self
    }

    /// Snapshot of every stored value keyed by id. Values carry no `id` field.
    pub fn serialize(&self) -> BTreeMap<RecordId, Record> {
        self.engine.clone()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.engine.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    /// The id the next insert will receive, or `None` once ids are
    /// exhausted.
    pub fn next_id(&self) -> Option<RecordId> {
        self.counter
    }

    /// Shallow-merge `update` into the stored record; `update` wins.
    fn merge(&mut self, id: RecordId, update: &Record) {
        if let Some(stored) = self.engine.get_mut(&id) {
            for (field, value) in update {
                if field != ID_FIELD {
                    stored.insert(field.clone(), value.clone());
                }
            }
            tracing::debug!(id, "record updated");
        }
    }

    fn matching_ids(&self, pattern: &Record) -> Vec<RecordId> {
        self.matching(pattern).map(|(id, _)| id).collect()
    }

    /// Entries matching `pattern`. An `id` in the pattern is compared to the
    /// engine key, since stored values never carry one.
    fn matching(&self, pattern: &Record) -> impl Iterator<Item = (RecordId, &Record)> + '_ {
        let expected_id = pattern.get(ID_FIELD).cloned();
        let fields = without_id(pattern);

        self.engine
            .iter()
            .filter(move |(id, record)| {
                expected_id
                    .as_ref()
                    .map_or(true, |expected| value_matches(&Value::from(**id), expected))
                    && is_match(record, &fields)
            })
            .map(|(id, record)| (*id, record))
    }
}

impl From<BTreeMap<RecordId, Record>> for Store {
    fn from(engine: BTreeMap<RecordId, Record>) -> Self {
        Self::with_engine(engine)
    }
}

/// Serializes as a JSON object keyed by id, holding the raw stored values.
impl Serialize for Store {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.engine.iter())
    }
}
