//! Storage backend trait definition.

use async_trait::async_trait;

use super::StoredRecord;
use crate::error::StoreError;

/// A backend that keeps configuration records.
///
/// Records are keyed by `(id, variation)` where `variation` is already
/// canonical (`""` for no variation). Implementations decide how records
/// are laid out and how connections are managed; the service only relies
/// on the operations below.
///
/// # Implementors
///
/// - `MemoryStore` - process-local map, lost on restart
/// - `FileStore` - one JSON file per record under a data directory
///
/// # Example
///
/// ```ignore
/// use confvault_store::{ConfigStore, MemoryStore, StoredRecord};
///
/// let store = MemoryStore::new();
/// store.open().await?;
/// store.upsert(StoredRecord::new("cfg1", None, "{}")).await?;
/// assert!(store.find_one("cfg1", "").await?.is_some());
/// ```
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Acquires backend resources. Called once at startup.
    ///
    /// The default implementation is a no-op.
    async fn open(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Releases backend resources. Called once at shutdown.
    ///
    /// The default implementation is a no-op.
    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Looks up the record stored for `(id, variation)`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when nothing is stored; errors only for backend failures.
    async fn find_one(&self, id: &str, variation: &str) -> Result<Option<StoredRecord>, StoreError>;

    /// Inserts the record or fully replaces the one stored under its key.
    async fn upsert(&self, record: StoredRecord) -> Result<(), StoreError>;

    /// Deletes the record stored for `(id, variation)`.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if a record was deleted, `Ok(false)` if none existed.
    async fn delete(&self, id: &str, variation: &str) -> Result<bool, StoreError>;

    /// Performs a health check on the backend.
    async fn health_check(&self) -> Result<(), StoreError>;

    /// Returns the name of this backend, for logging and health output.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct SingleSlot {
        slot: Mutex<Option<StoredRecord>>,
    }

    #[async_trait]
    impl ConfigStore for SingleSlot {
        async fn find_one(
            &self,
            id: &str,
            variation: &str,
        ) -> Result<Option<StoredRecord>, StoreError> {
            Ok(self
                .slot
                .lock()
                .clone()
                .filter(|r| r.matches(id, variation)))
        }

        async fn upsert(&self, record: StoredRecord) -> Result<(), StoreError> {
            *self.slot.lock() = Some(record);
            Ok(())
        }

        async fn delete(&self, id: &str, variation: &str) -> Result<bool, StoreError> {
            let mut slot = self.slot.lock();
            if slot.as_ref().is_some_and(|r| r.matches(id, variation)) {
                *slot = None;
                return Ok(true);
            }
            Ok(false)
        }

        async fn health_check(&self) -> Result<(), StoreError> {
            Ok(())
        }

        fn name(&self) -> &str {
            "single-slot"
        }
    }

    #[tokio::test]
    async fn test_default_lifecycle_is_noop() {
        let store = SingleSlot {
            slot: Mutex::new(None),
        };

        assert!(store.open().await.is_ok());
        assert!(store.close().await.is_ok());
    }

    #[tokio::test]
    async fn test_minimal_store() {
        let store = SingleSlot {
            slot: Mutex::new(None),
        };

        store
            .upsert(StoredRecord::new("cfg1", None, "{}"))
            .await
            .unwrap();

        assert!(store.find_one("cfg1", "").await.unwrap().is_some());
        assert!(store.find_one("cfg1", "A").await.unwrap().is_none());
        assert!(store.delete("cfg1", "").await.unwrap());
        assert!(!store.delete("cfg1", "").await.unwrap());
    }
}
