//! Service configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::CacheConfig;

/// Configuration for [`ConfigService`](crate::ConfigService).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Cache settings; `None` disables caching.
    #[serde(default = "default_cache")]
    cache: Option<CacheConfig>,

    /// Upper bound for a single store call, in seconds.
    #[serde(default = "default_store_timeout_secs")]
    store_timeout_secs: u64,
}

fn default_cache() -> Option<CacheConfig> {
    Some(CacheConfig::default())
}

fn default_store_timeout_secs() -> u64 {
    10
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache: default_cache(),
            store_timeout_secs: default_store_timeout_secs(),
        }
    }
}

impl ServiceConfig {
    /// Creates a new builder for ServiceConfig.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Returns the cache settings, if caching is enabled.
    pub fn cache(&self) -> Option<&CacheConfig> {
        self.cache.as_ref()
    }

    /// Returns whether caching is enabled.
    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Returns the per-call store timeout.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}

/// Builder for ServiceConfig.
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    cache: Option<CacheConfig>,
    store_timeout: Option<Duration>,
}

impl Default for ServiceConfigBuilder {
    fn default() -> Self {
        Self {
            cache: default_cache(),
            store_timeout: None,
        }
    }
}

impl ServiceConfigBuilder {
    /// Enables caching with the given refresh interval.
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.cache = Some(CacheConfig {
            refresh_interval_secs: interval.as_secs(),
        });
        self
    }

    /// Disables caching.
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    /// Sets the per-call store timeout.
    pub fn store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the store timeout or refresh interval is zero.
    pub fn build(self) -> Result<ServiceConfig, &'static str> {
        let store_timeout_secs = self
            .store_timeout
            .map(|t| t.as_secs())
            .unwrap_or_else(default_store_timeout_secs);

        if store_timeout_secs == 0 {
            return Err("store_timeout must be at least one second");
        }
        if self
            .cache
            .as_ref()
            .is_some_and(|c| c.refresh_interval_secs == 0)
        {
            return Err("refresh_interval must be at least one second");
        }

        Ok(ServiceConfig {
            cache: self.cache,
            store_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();

        assert!(config.cache_enabled());
        assert_eq!(
            config.cache().map(|c| c.refresh_interval()),
            Some(Duration::from_secs(3600))
        );
        assert_eq!(config.store_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_builder_full() {
        let config = ServiceConfig::builder()
            .refresh_interval(Duration::from_secs(60))
            .store_timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        assert_eq!(config.cache().unwrap().refresh_interval_secs, 60);
        assert_eq!(config.store_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_builder_without_cache() {
        let config = ServiceConfig::builder().without_cache().build().unwrap();
        assert!(!config.cache_enabled());
    }

    #[test]
    fn test_builder_rejects_zero() {
        assert!(
            ServiceConfig::builder()
                .store_timeout(Duration::from_millis(10))
                .build()
                .is_err()
        );
        assert!(
            ServiceConfig::builder()
                .refresh_interval(Duration::ZERO)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ServiceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ServiceConfig::default());

        let config: ServiceConfig = serde_json::from_str(r#"{"cache":null}"#).unwrap();
        assert!(!config.cache_enabled());
    }
}
