//! Cache de configuraciones con expiracion global.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::debug;

use crate::metrics::{CacheMetrics, EvictionReason};

/// Configuracion del cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Intervalo de refresco en segundos (default: 3600 = una hora)
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

fn default_refresh_interval_secs() -> u64 {
    3600
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

impl CacheConfig {
    /// Returns the refresh interval as a duration.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

#[derive(Debug)]
struct CacheState {
    entries: HashMap<String, Arc<str>>,
    last_refresh: Instant,
    /// Bumped by every write-back and invalidation.
    generation: u64,
}

/// Cache of resolved configurations, keyed by cache key.
///
/// Values are the JSON projection of the configuration. Expiry is coarse:
/// once the refresh interval has elapsed since the last refresh, the next
/// access clears every entry and restarts the clock. Entries never expire
/// individually.
///
/// All bookkeeping happens under one mutex; it is never held across an
/// await point.
///
/// Readers that fill the cache from the store take a [`generation`]
/// before the store call and fill through [`insert_if_unchanged`], so a
/// value read before a concurrent save or remove is never cached after it.
///
/// [`generation`]: ConfigCache::generation
/// [`insert_if_unchanged`]: ConfigCache::insert_if_unchanged
///
/// # Example
///
/// ```
/// use confvault_service::cache::{CacheConfig, ConfigCache};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let cache = ConfigCache::new(CacheConfig::default());
/// cache.insert("cfg1_", r#"{"id":"cfg1","variation":""}"#);
///
/// assert!(cache.get("cfg1_").is_some());
/// assert!(cache.get("cfg1_A").is_none());
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigCache {
    state: Mutex<CacheState>,
    refresh_interval: Duration,
    metrics: CacheMetrics,
}

impl ConfigCache {
    /// Crea un nuevo cache con la configuracion dada.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                last_refresh: Instant::now(),
                generation: 0,
            }),
            refresh_interval: config.refresh_interval(),
            metrics: CacheMetrics::new(),
        }
    }

    /// Obtiene un valor del cache si existe, expirando todo el cache antes
    /// si el intervalo vencio.
    pub fn get(&self, key: &str) -> Option<Arc<str>> {
        let start = Instant::now();
        let mut state = self.state.lock();
        self.expire_if_due(&mut state);

        let result = state.entries.get(key).cloned();
        drop(state);

        if result.is_some() {
            debug!(key = %key, "Cache hit");
            self.metrics.record_hit();
        } else {
            debug!(key = %key, "Cache miss");
            self.metrics.record_miss();
        }
        self.metrics
            .record_operation_duration("get", start.elapsed());

        result
    }

    /// Inserta o reemplaza un valor (write-back tras un save).
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Arc<str>>) {
        let start = Instant::now();
        let mut state = self.state.lock();
        self.expire_if_due(&mut state);

        state.generation += 1;
        let count = self.put(&mut state, key.into(), value.into());
        drop(state);

        self.metrics.update_entry_count(count);
        self.metrics
            .record_operation_duration("insert", start.elapsed());
    }

    /// Retorna la generacion actual del cache.
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Inserta un valor leido del store solo si no hubo writes ni
    /// invalidaciones desde `generation`. Retorna true si se inserto.
    pub fn insert_if_unchanged(
        &self,
        key: impl Into<String>,
        value: impl Into<Arc<str>>,
        generation: u64,
    ) -> bool {
        let start = Instant::now();
        let mut state = self.state.lock();
        self.expire_if_due(&mut state);

        if state.generation != generation {
            drop(state);
            debug!(generation, "Cache changed during read, value not cached");
            return false;
        }

        let count = self.put(&mut state, key.into(), value.into());
        drop(state);

        self.metrics.update_entry_count(count);
        self.metrics
            .record_operation_duration("insert", start.elapsed());
        true
    }

    /// Invalida una entrada especifica. Retorna true si existia.
    pub fn invalidate(&self, key: &str) -> bool {
        let mut state = self.state.lock();
        state.generation += 1;
        let removed = state.entries.remove(key).is_some();
        let count = state.entries.len();
        drop(state);

        if removed {
            debug!(key = %key, "Cache entry invalidated");
            self.metrics.record_evictions(EvictionReason::Removed, 1);
            self.metrics.update_entry_count(count);
        }
        removed
    }

    /// Invalida todas las entradas y reinicia el reloj de refresco.
    /// Retorna el numero de entradas eliminadas.
    pub fn invalidate_all(&self) -> usize {
        let mut state = self.state.lock();
        let count = state.entries.len();
        state.entries.clear();
        state.last_refresh = Instant::now();
        state.generation += 1;
        drop(state);

        self.metrics
            .record_evictions(EvictionReason::Removed, count as u64);
        self.metrics.update_entry_count(0);
        count
    }

    /// Retorna el numero de entries en cache.
    pub fn entry_count(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Returns the configured refresh interval.
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Returns the metrics recorder of this cache.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    fn put(&self, state: &mut CacheState, key: String, value: Arc<str>) -> usize {
        if state.entries.insert(key, value).is_some() {
            self.metrics.record_evictions(EvictionReason::Replaced, 1);
        }
        state.entries.len()
    }

    fn expire_if_due(&self, state: &mut CacheState) {
        if state.last_refresh.elapsed() <= self.refresh_interval {
            return;
        }

        let expired = state.entries.len();
        state.entries.clear();
        state.last_refresh = Instant::now();

        debug!(expired, "Refresh interval elapsed, cache cleared");
        self.metrics
            .record_evictions(EvictionReason::Expired, expired as u64);
        self.metrics.update_entry_count(0);
    }
}
