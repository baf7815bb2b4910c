//! Cache metrics recording.

use metrics::{counter, gauge, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Registra las metricas de cache.
/// Llamar una vez al inicio, despues de instalar el recorder.
pub fn register_cache_metrics() {
    metrics::describe_counter!("confvault_cache_hits_total", "Total number of cache hits");
    metrics::describe_counter!(
        "confvault_cache_misses_total",
        "Total number of cache misses"
    );
    metrics::describe_counter!(
        "confvault_cache_evictions_total",
        "Total number of cache evictions"
    );
    metrics::describe_gauge!(
        "confvault_cache_entries",
        "Current number of entries in cache"
    );
    metrics::describe_histogram!(
        "confvault_cache_operation_seconds",
        "Time spent on cache operations"
    );
}

/// Motivo por el que una entrada sale del cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
    /// Expiro el intervalo global de refresco.
    Expired,
    /// Invalidacion explicita (remove, save-as-json, flush manual).
    Removed,
    /// Sobrescrita por un save tipado.
    Replaced,
}

impl EvictionReason {
    /// Etiqueta usada en la metrica.
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionReason::Expired => "expired",
            EvictionReason::Removed => "removed",
            EvictionReason::Replaced => "replaced",
        }
    }
}

/// Recorder de metricas de cache.
/// Mantiene contadores atomicos locales ademas de publicar al facade.
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("confvault_cache_hits_total").increment(1);
    }

    /// Registra un cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("confvault_cache_misses_total").increment(1);
    }

    /// Registra `count` evictions con el motivo dado
    pub fn record_evictions(&self, reason: EvictionReason, count: u64) {
        if count == 0 {
            return;
        }
        counter!("confvault_cache_evictions_total", "reason" => reason.as_str()).increment(count);
    }

    /// Actualiza el gauge de entries
    pub fn update_entry_count(&self, count: usize) {
        gauge!("confvault_cache_entries").set(count as f64);
    }

    /// Registra la duracion de una operacion
    pub fn record_operation_duration(&self, operation: &'static str, duration: Duration) {
        histogram!("confvault_cache_operation_seconds", "operation" => operation)
            .record(duration.as_secs_f64());
    }

    /// Calcula hit rate (para logging/debugging)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    /// Retorna el numero de hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Retorna el numero de misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate() {
        let metrics = CacheMetrics::new();
        assert_eq!(metrics.hit_rate(), 0.0);

        // 3 hits, 1 miss = 75%
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();

        assert!((metrics.hit_rate() - 0.75).abs() < 0.001);
        assert_eq!(metrics.hits(), 3);
        assert_eq!(metrics.misses(), 1);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = CacheMetrics::new();
        let other = metrics.clone();

        other.record_miss();
        assert_eq!(metrics.misses(), 1);
    }

    #[test]
    fn test_eviction_labels() {
        assert_eq!(EvictionReason::Expired.as_str(), "expired");
        assert_eq!(EvictionReason::Removed.as_str(), "removed");
        assert_eq!(EvictionReason::Replaced.as_str(), "replaced");
    }
}
