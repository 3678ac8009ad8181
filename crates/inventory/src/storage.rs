//! Durable key/value slot abstraction and the snapshot format.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::record::EquipmentRecord;

/// Default slot key the record collection is written under.
pub const STORAGE_KEY: &str = "equipment";

/// Failure reported by a [`SlotStore`] backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Storage is disabled or could not be opened.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backend refused the write for lack of space.
    #[error("storage quota exceeded")]
    QuotaExceeded,

    /// Any other backend failure (IO, driver, ...).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Synchronous string key/value storage.
///
/// `put` fully replaces any previous value under the key; there are no
/// partial writes.
pub trait SlotStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S> SlotStore for Arc<S>
where
    S: SlotStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory slot store for tests/dev.
///
/// Writes can be made to fail with [`StorageError::QuotaExceeded`] to
/// exercise the write-failure path.
#[derive(Debug, Default)]
pub struct InMemorySlotStore {
    inner: RwLock<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl InMemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one raw value.
    pub fn with_value(key: &str, raw: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.inner.write() {
            map.insert(key.to_string(), raw.into());
        }
        store
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl SlotStore for InMemorySlotStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::Backend("lock poisoned".into()))?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::QuotaExceeded);
        }
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::Backend("lock poisoned".into()))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::Backend("lock poisoned".into()))?;
        map.remove(key);
        Ok(())
    }
}

/// Serialize the full collection (JSON array, insertion order).
pub fn encode_snapshot(records: &[EquipmentRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}

/// Parse a stored collection. No validation beyond the JSON shape.
pub fn decode_snapshot(raw: &str) -> Result<Vec<EquipmentRecord>, serde_json::Error> {
    serde_json::from_str(raw)
}
