//! SharedStore - cloneable, lock-guarded handle to a [`Store`].

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{Store, StoreError};
use crate::record::{Record, RecordId};

/// Thread-safe handle around a [`Store`].
///
/// Clone-friendly via Arc: every clone sees the same records. Each method
/// runs one whole store operation under a single lock acquisition.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<Store>>,
}

impl SharedStore {
    /// Create a handle around a fresh empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle around an existing store.
    pub fn from_store(store: Store) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Store>, StoreError> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Store>, StoreError> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }

    /// Run `f` against the store under a read lock.
    pub fn with<T>(&self, f: impl FnOnce(&Store) -> T) -> Result<T, StoreError> {
        Ok(f(&*self.read()?))
    }

    /// Run `f` against the store under a write lock.
    pub fn with_mut<T>(&self, f: impl FnOnce(&mut Store) -> T) -> Result<T, StoreError> {
        Ok(f(&mut *self.write()?))
    }

    pub fn insert(&self, record: Record) -> Result<Record, StoreError> {
        self.write()?.insert(record)
    }

    /// Insert a batch under one lock, preserving order.
    ///
    /// Fails with [`StoreError::IdsExhausted`] before inserting anything if
    /// the batch needs more ids than the store has left.
    pub fn insert_many(&self, records: Vec<Record>) -> Result<Vec<Record>, StoreError> {
        let mut store = self.write()?;
        if !has_room(store.next_id(), records.len()) {
            return Err(StoreError::IdsExhausted);
        }
        records.into_iter().map(|record| store.insert(record)).collect()
    }

    pub fn get(&self, id: RecordId) -> Result<Option<Record>, StoreError> {
        Ok(self.read()?.get(id))
    }

    pub fn find_one(&self, pattern: &Record) -> Result<Option<Record>, StoreError> {
        Ok(self.read()?.find_one(pattern))
    }

    pub fn find_many(&self, pattern: &Record) -> Result<Vec<Record>, StoreError> {
        Ok(self.read()?.find_many(pattern))
    }

    pub fn replace(&self, id: RecordId, data: &Record) -> Result<Record, StoreError> {
        self.write()?.replace(id, data)
    }

    pub fn update_one(
        &self,
        pattern: &Record,
        update: &Record,
    ) -> Result<Option<Record>, StoreError> {
        Ok(self.write()?.update_one(pattern, update))
    }

    pub fn update_many(
        &self,
        pattern: &Record,
        update: &Record,
    ) -> Result<Vec<Record>, StoreError> {
        Ok(self.write()?.update_many(pattern, update))
    }

    pub fn remove_one(&self, pattern: &Record) -> Result<Option<Record>, StoreError> {
        Ok(self.write()?.remove_one(pattern))
    }

    pub fn remove_many(&self, pattern: &Record) -> Result<Vec<Record>, StoreError> {
        Ok(self.write()?.remove_many(pattern))
    }

    /// Remove every record. The id counter is not reset.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.write()?.clear();
        Ok(())
    }

    pub fn serialize(&self) -> Result<BTreeMap<RecordId, Record>, StoreError> {
        Ok(self.read()?.serialize())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.is_empty())
    }
}

/// Whether `count` ids can be assigned starting at `next`.
fn has_room(next: Option<RecordId>, count: usize) -> bool {
    match (next, count) {
        (_, 0) => true,
        (None, _) => false,
        (Some(next), count) => {
            let remaining = u128::from(RecordId::MAX - next) + 1;
            (count as u128) <= remaining
        }
    }
}

impl From<Store> for SharedStore {
    fn from(store: Store) -> Self {
        Self::from_store(store)
    }
}
