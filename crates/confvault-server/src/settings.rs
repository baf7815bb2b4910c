//! Server settings.
//!
//! Settings are merged from built-in defaults, an optional TOML file and
//! environment variables, in that order. Environment variables use the
//! `CONFVAULT` prefix and `__` as section separator, e.g.
//! `CONFVAULT__SERVER__PORT=9090` or `CONFVAULT__STORE__KIND=file`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use confvault_service::ServiceConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File read when no explicit path is given.
pub const DEFAULT_SETTINGS_FILE: &str = "confvault.toml";

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The sources could not be read or merged.
    #[error("config build error: {0}")]
    Load(#[from] config::ConfigError),

    /// The merged settings are inconsistent.
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Top-level server settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub server: HttpSettings,
    pub store: StoreSettings,
    pub defaults: DefaultsSettings,
    pub cache: CacheSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub host: String,
    pub port: u16,
    /// Prefix of the configuration endpoints.
    pub base_path: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            base_path: "/configuration".to_string(),
        }
    }
}

/// Storage backends that can be selected at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Memory,
    File,
}

/// Storage backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub kind: StoreKind,
    /// Data directory of the file store.
    pub data_dir: Option<PathBuf>,
    /// Upper bound for a single store call.
    pub timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            kind: StoreKind::Memory,
            data_dir: None,
            timeout_secs: 10,
        }
    }
}

/// Default bundle settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsSettings {
    /// Directory of `<variation name>.properties` bundles.
    pub dir: Option<PathBuf>,
}

/// Cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub refresh_interval_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            refresh_interval_secs: 3600,
        }
    }
}

impl ServerSettings {
    /// Loads settings from `path` (or [`DEFAULT_SETTINGS_FILE`] when `None`)
    /// and the environment, then validates them. A missing file is not an
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let file = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));

        let mut builder = Config::builder();
        if file.exists() {
            builder = builder.add_source(File::from(file));
        }
        builder = builder.add_source(
            Environment::with_prefix("CONFVAULT")
                .try_parsing(true)
                .separator("__"),
        );

        let settings: ServerSettings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.server.port == 0 {
            return Err(SettingsError::Invalid("server.port must be > 0".into()));
        }

        let base = &self.server.base_path;
        if !base.starts_with('/') || base.len() < 2 || base.ends_with('/') {
            return Err(SettingsError::Invalid(format!(
                "server.base_path must look like '/name', got '{}'",
                base
            )));
        }

        if self.store.kind == StoreKind::File && self.store.data_dir.is_none() {
            return Err(SettingsError::Invalid(
                "store.kind=file requires store.data_dir".into(),
            ));
        }
        if self.store.timeout_secs == 0 {
            return Err(SettingsError::Invalid(
                "store.timeout_secs must be > 0".into(),
            ));
        }
        if self.cache.enabled && self.cache.refresh_interval_secs == 0 {
            return Err(SettingsError::Invalid(
                "cache.refresh_interval_secs must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Returns the socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| SettingsError::Invalid(format!("invalid listen address: {}", e)))
    }

    /// Builds the service configuration from the cache and store sections.
    pub fn service_config(&self) -> Result<ServiceConfig, SettingsError> {
        let mut builder = ServiceConfig::builder()
            .store_timeout(Duration::from_secs(self.store.timeout_secs));

        builder = if self.cache.enabled {
            builder.refresh_interval(Duration::from_secs(self.cache.refresh_interval_secs))
        } else {
            builder.without_cache()
        };

        builder
            .build()
            .map_err(|e| SettingsError::Invalid(e.to_string()))
    }
}
