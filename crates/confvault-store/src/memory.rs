//! In-memory backend.

use std::collections::HashMap;

use async_trait::async_trait;
use confvault_core::ConfigIdentity;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::store::{ConfigStore, StoredRecord};

/// A process-local store backed by a map.
///
/// Contents are lost when the process exits. Useful for development,
/// embedding and tests. Records are keyed by `(id, variation)`, not by
/// the flattened cache key.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<ConfigIdentity, StoredRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with records.
    pub fn with_records(records: impl IntoIterator<Item = StoredRecord>) -> Self {
        let records = records.into_iter().map(|r| (r.identity(), r)).collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn find_one(&self, id: &str, variation: &str) -> Result<Option<StoredRecord>, StoreError> {
        let key = ConfigIdentity::new(id, Some(variation));
        Ok(self.records.read().get(&key).cloned())
    }

    async fn upsert(&self, record: StoredRecord) -> Result<(), StoreError> {
        debug!(id = %record.id(), variation = %record.variation(), "Upserting record");
        self.records.write().insert(record.identity(), record);
        Ok(())
    }

    async fn delete(&self, id: &str, variation: &str) -> Result<bool, StoreError> {
        let key = ConfigIdentity::new(id, Some(variation));
        Ok(self.records.write().remove(&key).is_some())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
