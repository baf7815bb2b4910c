//! Configuration service: resolution, persistence and caching.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use confvault_core::{
    ConfigIdentity, Configuration, ConfigurationError, DefaultSource, Resolution, Result,
    StaticDefaults, canonicalize_variation, with_identity,
};
use confvault_store::{ConfigStore, StoreError, StoredRecord};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::cache::ConfigCache;
use crate::config::ServiceConfig;

const ID_FIELD: &str = "id";
const VARIATION_FIELD: &str = "variation";

/// Resolves, saves and removes configurations against a store.
///
/// The service owns the resolution algorithm shared by every backend:
/// look in the cache, then in the store, and when nothing is stored
/// materialize the defaults of the requested type and persist them.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use confvault_service::{ConfigService, ServiceConfig};
/// use confvault_store::MemoryStore;
///
/// let service = ConfigService::new(
///     Arc::new(MemoryStore::new()),
///     Arc::new(defaults),
///     ServiceConfig::default(),
/// );
///
/// let greeting: Greeting = service.get("greeting", None).await?;
/// ```
pub struct ConfigService {
    store: Arc<dyn ConfigStore>,
    defaults: Arc<dyn DefaultSource>,
    cache: Option<ConfigCache>,
    store_timeout: Duration,
}

impl std::fmt::Debug for ConfigService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigService")
            .field("store", &self.store.name())
            .field("cache", &self.cache)
            .field("store_timeout", &self.store_timeout)
            .finish()
    }
}

impl ConfigService {
    /// Creates a service over the given store and default source.
    pub fn new(
        store: Arc<dyn ConfigStore>,
        defaults: Arc<dyn DefaultSource>,
        config: ServiceConfig,
    ) -> Self {
        let cache = config.cache().cloned().map(ConfigCache::new);

        info!(
            store = store.name(),
            cache_enabled = cache.is_some(),
            "Configuration service created"
        );

        Self {
            store,
            defaults,
            cache,
            store_timeout: config.store_timeout(),
        }
    }

    /// Creates a service without default bundles.
    pub fn without_defaults(store: Arc<dyn ConfigStore>, config: ServiceConfig) -> Self {
        Self::new(store, Arc::new(StaticDefaults::new()), config)
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<dyn ConfigStore> {
        &self.store
    }

    /// Returns the cache, if enabled.
    pub fn cache(&self) -> Option<&ConfigCache> {
        self.cache.as_ref()
    }

    /// Resolves a typed configuration.
    ///
    /// Returns `Found` when the value came from the cache or the store and
    /// `Defaulted` when it was materialized from defaults and persisted.
    /// The typed path never yields `NotFound`.
    ///
    /// # Errors
    ///
    /// Fails with `Get` on any store failure or undecodable stored value,
    /// and with `Get` wrapping `LoadingDefault` when nothing is stored and
    /// no defaults exist for the variation name.
    #[instrument(skip_all, fields(id = %id, variation = ?variation))]
    pub async fn resolve<T: Configuration>(
        &self,
        id: &str,
        variation: Option<&str>,
    ) -> Result<Resolution<T>> {
        let identity = ConfigIdentity::new(id, variation);
        let key = identity.cache_key();

        if let Some(cache) = &self.cache
            && let Some(json) = cache.get(&key)
        {
            return decode::<T>(&json, id).map(Resolution::Found);
        }

        let generation = self.cache_generation();
        let found = self
            .call(self.store.find_one(identity.id(), identity.variation()))
            .await
            .map_err(|e| read_error(id, e))?;

        if let Some(record) = found {
            let configuration = decode::<T>(record.document(), id)?;
            self.cache_fill(key, record.into_document(), generation);
            return Ok(Resolution::Found(configuration));
        }

        let configuration = self.materialize_default::<T>(identity, generation).await?;
        Ok(Resolution::Defaulted(configuration))
    }

    /// Returns a typed configuration, materializing defaults on a miss.
    ///
    /// See [`resolve`](Self::resolve) for failure modes.
    pub async fn get<T: Configuration>(&self, id: &str, variation: Option<&str>) -> Result<T> {
        self.resolve::<T>(id, variation)
            .await?
            .into_value()
            .ok_or_else(|| ConfigurationError::get(read_message(id)))
    }

    /// Resolves the stored JSON of a configuration.
    ///
    /// No type is known on this path, so defaults are never materialized:
    /// a miss is `NotFound`.
    #[instrument(skip_all, fields(id = %id, variation = ?variation))]
    pub async fn resolve_json(
        &self,
        id: &str,
        variation: Option<&str>,
    ) -> Result<Resolution<String>> {
        let identity = ConfigIdentity::new(id, variation);
        let key = identity.cache_key();

        if let Some(cache) = &self.cache
            && let Some(json) = cache.get(&key)
        {
            return Ok(Resolution::Found(json.to_string()));
        }

        let generation = self.cache_generation();
        let found = self
            .call(self.store.find_one(identity.id(), identity.variation()))
            .await
            .map_err(|e| read_error(id, e))?;

        match found {
            Some(record) => {
                let document = record.into_document();
                self.cache_fill(key, document.clone(), generation);
                Ok(Resolution::Found(document))
            },
            None => {
                debug!("Configuration not stored");
                Ok(Resolution::NotFound)
            },
        }
    }

    /// Returns the stored JSON verbatim, or `None` when nothing is stored.
    pub async fn get_as_json(&self, id: &str, variation: Option<&str>) -> Result<Option<String>> {
        Ok(self.resolve_json(id, variation).await?.into_value())
    }

    /// Saves a typed configuration, replacing whatever is stored under its
    /// identity. The cache entry is overwritten with the saved value.
    ///
    /// # Errors
    ///
    /// Fails with `Save` if serialization or the store write fails.
    #[instrument(skip_all, fields(id = %configuration.id(), variation = %configuration.variation()))]
    pub async fn save<T: Configuration>(&self, configuration: &T) -> Result<()> {
        let json = self.persist(configuration).await?;
        self.cache_put(configuration.cache_key(), json);
        Ok(())
    }

    /// Saves a raw JSON configuration.
    ///
    /// The document must be a JSON object with a non-blank string `id`. A
    /// missing, `null`, blank or `"null"` variation is stored as `""`. The
    /// cache entry is evicted so the next read goes to the store.
    ///
    /// # Errors
    ///
    /// Fails with `Save` on malformed input or store failure.
    #[instrument(skip_all)]
    pub async fn save_as_json(&self, json: &str) -> Result<()> {
        let (identity, document) = normalize_document(json)?;
        let id = identity.id().to_string();

        debug!(id = %id, variation = %identity.variation(), "Saving raw configuration");

        self.call(self.store.upsert(StoredRecord::for_identity(&identity, document)))
            .await
            .map_err(|e| {
                ConfigurationError::save_with_cause(
                    format!("Error saving configuration \"{}\"!", id),
                    e,
                )
            })?;

        self.cache_evict(&identity.cache_key());
        Ok(())
    }

    /// Removes a configuration. Removing a missing configuration succeeds.
    ///
    /// # Errors
    ///
    /// Fails with `Remove` on store failure.
    #[instrument(skip_all, fields(id = %id, variation = ?variation))]
    pub async fn remove(&self, id: &str, variation: Option<&str>) -> Result<()> {
        let identity = ConfigIdentity::new(id, variation);

        let deleted = self
            .call(self.store.delete(identity.id(), identity.variation()))
            .await
            .map_err(|e| {
                ConfigurationError::remove_with_cause(
                    format!("Error removing configuration \"{}\"!", id),
                    e,
                )
            })?;

        debug!(deleted, "Configuration removed");
        self.cache_evict(&identity.cache_key());
        Ok(())
    }

    /// Drops every cached entry. Returns the number of entries dropped.
    pub fn invalidate_cache(&self) -> usize {
        let count = self.cache.as_ref().map_or(0, ConfigCache::invalidate_all);
        info!(count, "Cache invalidated");
        count
    }

    /// Checks the health of the underlying store, bounded by the store
    /// timeout.
    pub async fn health_check(&self) -> std::result::Result<(), StoreError> {
        self.call(self.store.health_check()).await
    }

    async fn materialize_default<T: Configuration>(
        &self,
        identity: ConfigIdentity,
        generation: u64,
    ) -> Result<T> {
        let id = identity.id().to_string();
        let mut configuration: T = with_identity(identity);

        if let Err(e) = configuration.reset_to_default(self.defaults.as_ref()) {
            warn!(
                variation_name = %configuration.variation_name(),
                error = %e,
                "No defaults available"
            );
            return Err(ConfigurationError::get_with_cause(
                format!(
                    "Error loading default configuration for {}",
                    short_type_name::<T>()
                ),
                e,
            ));
        }

        let json = self.persist(&configuration).await.map_err(|e| {
            ConfigurationError::get_with_cause(read_message(&id), e)
        })?;
        self.cache_fill(configuration.cache_key(), json, generation);

        info!(variation_name = %configuration.variation_name(), "Default configuration persisted");
        Ok(configuration)
    }

    async fn persist<T: Configuration>(&self, configuration: &T) -> Result<String> {
        let save_error = |e: Box<dyn std::error::Error + Send + Sync>| ConfigurationError::Save {
            message: format!("Error saving configuration \"{}\"!", configuration.id()),
            cause: Some(e),
        };

        let json = serde_json::to_string(configuration).map_err(|e| save_error(e.into()))?;

        self.call(self.store.upsert(StoredRecord::for_identity(
            configuration.identity(),
            json.clone(),
        )))
        .await
        .map_err(|e| save_error(e.into()))?;

        Ok(json)
    }

    async fn call<R, F>(&self, operation: F) -> std::result::Result<R, StoreError>
    where
        F: Future<Output = std::result::Result<R, StoreError>>,
    {
        match tokio::time::timeout(self.store_timeout, operation).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                seconds: self.store_timeout.as_secs(),
            }),
        }
    }

    fn cache_put(&self, key: String, json: String) {
        if let Some(cache) = &self.cache {
            cache.insert(key, json);
        }
    }

    fn cache_generation(&self) -> u64 {
        self.cache.as_ref().map_or(0, ConfigCache::generation)
    }

    /// Caches a value read before `generation` was superseded; dropped if
    /// a save or remove landed in between.
    fn cache_fill(&self, key: String, json: String, generation: u64) {
        if let Some(cache) = &self.cache {
            cache.insert_if_unchanged(key, json, generation);
        }
    }

    fn cache_evict(&self, key: &str) {
        if let Some(cache) = &self.cache {
            cache.invalidate(key);
        }
    }
}

fn read_message(id: &str) -> String {
    format!("Error reading configuration \"{}\"!", id)
}

fn read_error(id: &str, cause: StoreError) -> ConfigurationError {
    ConfigurationError::get_with_cause(read_message(id), cause)
}

fn decode<T: Configuration>(json: &str, id: &str) -> Result<T> {
    serde_json::from_str(json).map_err(|e| ConfigurationError::get_with_cause(read_message(id), e))
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Validates a raw configuration and rewrites its variation to canonical
/// form. Returns the identity and the document to store.
fn normalize_document(json: &str) -> Result<(ConfigIdentity, String)> {
    let invalid = |reason: &str| {
        ConfigurationError::save(format!("Error saving configuration \"{}\"! {}", json, reason))
    };

    let mut value: Value = serde_json::from_str(json).map_err(|e| {
        ConfigurationError::save_with_cause(format!("Error saving configuration \"{}\"!", json), e)
    })?;

    let object = value
        .as_object_mut()
        .ok_or_else(|| invalid("Configuration must be a JSON object"))?;

    let id = match object.get(ID_FIELD) {
        Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
        _ => return Err(invalid("Configuration must have a non-blank string id")),
    };

    let variation = match object.get(VARIATION_FIELD) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(v)) => canonicalize_variation(Some(v)),
        Some(_) => return Err(invalid("Configuration variation must be a string")),
    };

    object.insert(VARIATION_FIELD.to_string(), Value::String(variation.clone()));

    Ok((ConfigIdentity::new(id, Some(variation.as_str())), value.to_string()))
}
