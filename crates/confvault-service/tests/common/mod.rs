#![allow(dead_code)]
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use confvault_core::{
    ConfigIdentity, Configuration, DefaultBundle, DefaultSource, Result, StaticDefaults,
};
use confvault_service::{ConfigService, ServiceConfig};
use confvault_store::{ConfigStore, MemoryStore, StoreError, StoredRecord};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Configuration with a single `test` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestConfiguration {
    #[serde(flatten)]
    pub identity: ConfigIdentity,
    pub test: Option<String>,
}

impl TestConfiguration {
    pub fn new(id: &str, variation: Option<&str>, test: &str) -> Self {
        Self {
            identity: ConfigIdentity::new(id, variation),
            test: Some(test.to_string()),
        }
    }
}

impl Configuration for TestConfiguration {
    fn identity(&self) -> &ConfigIdentity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut ConfigIdentity {
        &mut self.identity
    }

    fn reset_to_default(&mut self, defaults: &dyn DefaultSource) -> Result<()> {
        let bundle = defaults.require_bundle(&self.variation_name())?;
        self.test = Some(bundle.require("test")?.to_string());
        Ok(())
    }
}

/// Bundles for `testConfiguration` and its A/B variations.
pub fn test_defaults() -> StaticDefaults {
    StaticDefaults::new()
        .with_bundle(DefaultBundle::new("testConfiguration").with("test", "Hello world"))
        .with_bundle(DefaultBundle::new("testConfiguration-A").with("test", "Hello world A"))
        .with_bundle(DefaultBundle::new("testConfiguration-B").with("test", "Hello world B"))
}

/// Memory store that counts calls and can be told to fail or stall.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    finds: AtomicUsize,
    upserts: AtomicUsize,
    deletes: AtomicUsize,
    failing: AtomicBool,
    failing_writes: AtomicBool,
    stall: Mutex<Option<Duration>>,
    read_delay: Mutex<Option<Duration>>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    pub fn upserts(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Fails upserts only; lookups and deletes keep working.
    pub fn set_failing_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }

    pub fn set_stall(&self, stall: Option<Duration>) {
        *self.stall.lock() = stall;
    }

    /// Delays `find_one` replies after the record was read, so the reply
    /// may be older than the store by the time it arrives.
    pub fn set_read_delay(&self, delay: Option<Duration>) {
        *self.read_delay.lock() = delay;
    }

    /// Writes directly to the backing store, bypassing counters.
    pub async fn seed(&self, record: StoredRecord) {
        self.inner.upsert(record).await.unwrap();
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    async fn before_call(&self) -> std::result::Result<(), StoreError> {
        let stall = *self.stall.lock();
        if let Some(stall) = stall {
            tokio::time::sleep(stall).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for CountingStore {
    async fn find_one(
        &self,
        id: &str,
        variation: &str,
    ) -> std::result::Result<Option<StoredRecord>, StoreError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.before_call().await?;
        let found = self.inner.find_one(id, variation).await?;

        let delay = *self.read_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(found)
    }

    async fn upsert(&self, record: StoredRecord) -> std::result::Result<(), StoreError> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.before_call().await?;
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("read-only replica"));
        }
        self.inner.upsert(record).await
    }

    async fn delete(&self, id: &str, variation: &str) -> std::result::Result<bool, StoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.before_call().await?;
        self.inner.delete(id, variation).await
    }

    async fn health_check(&self) -> std::result::Result<(), StoreError> {
        self.before_call().await
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Service over a counting store with test defaults and a one hour cache.
pub fn cached_service() -> (Arc<CountingStore>, ConfigService) {
    service_with(ServiceConfig::default())
}

/// Service over a counting store with test defaults and no cache.
pub fn uncached_service() -> (Arc<CountingStore>, ConfigService) {
    service_with(ServiceConfig::builder().without_cache().build().unwrap())
}

pub fn service_with(config: ServiceConfig) -> (Arc<CountingStore>, ConfigService) {
    let store = Arc::new(CountingStore::new());
    let service = ConfigService::new(store.clone(), Arc::new(test_defaults()), config);
    (store, service)
}
