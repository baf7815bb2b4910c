//! Default-value sources.
//!
//! A default source maps a variation name (see
//! [`build_variation_name`](crate::build_variation_name)) to a bundle of
//! named string values. Configuration types read their defaults from a
//! bundle in [`Configuration::reset_to_default`](crate::Configuration::reset_to_default).

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::{ConfigurationError, Result};

/// File extension of default bundles on disk.
const BUNDLE_EXTENSION: &str = "properties";

/// A named set of default field values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultBundle {
    name: String,
    values: IndexMap<String, String>,
}

impl DefaultBundle {
    /// Creates an empty bundle with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: IndexMap::new(),
        }
    }

    /// Builder-style method to add a value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns the bundle name (the variation name it was registered under).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns a value by key, failing with `LoadingDefault` when missing.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| {
            ConfigurationError::loading_default(format!(
                "Couldn't find key '{}' in configuration resource: {}",
                key, self.name
            ))
        })
    }

    /// Parses a value, failing with `LoadingDefault` when missing or invalid.
    pub fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let raw = self.require(key)?;
        raw.trim().parse::<T>().map_err(|e| {
            ConfigurationError::loading_default_with_cause(
                format!(
                    "Invalid value '{}' for key '{}' in configuration resource: {}",
                    raw, key, self.name
                ),
                e,
            )
        })
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the bundle has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Keyed lookup from variation name to a default bundle.
pub trait DefaultSource: Send + Sync {
    /// Returns the bundle registered for `variation_name`, if any.
    fn bundle(&self, variation_name: &str) -> Option<DefaultBundle>;

    /// Returns the bundle or a `LoadingDefault` error naming the resource.
    fn require_bundle(&self, variation_name: &str) -> Result<DefaultBundle> {
        self.bundle(variation_name).ok_or_else(|| {
            ConfigurationError::loading_default(format!(
                "Couldn't load configuration resource: {}",
                variation_name
            ))
        })
    }
}

/// In-memory default source.
///
/// # Example
///
/// ```
/// use confvault_core::{DefaultBundle, DefaultSource, StaticDefaults};
///
/// let defaults = StaticDefaults::new()
///     .with_bundle(DefaultBundle::new("greeting").with("test", "Hello world"));
///
/// assert_eq!(defaults.bundle("greeting").unwrap().get("test"), Some("Hello world"));
/// assert!(defaults.bundle("greeting-A").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticDefaults {
    bundles: HashMap<String, DefaultBundle>,
}

impl StaticDefaults {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style method to register a bundle under its own name.
    pub fn with_bundle(mut self, bundle: DefaultBundle) -> Self {
        self.insert(bundle);
        self
    }

    /// Registers a bundle under its own name, replacing any previous one.
    pub fn insert(&mut self, bundle: DefaultBundle) {
        self.bundles.insert(bundle.name().to_string(), bundle);
    }

    /// Returns the number of registered bundles.
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Returns true if no bundle is registered.
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

impl DefaultSource for StaticDefaults {
    fn bundle(&self, variation_name: &str) -> Option<DefaultBundle> {
        self.bundles.get(variation_name).cloned()
    }
}

/// Default source backed by a directory of `.properties` files.
///
/// Each `<variation name>.properties` file becomes one bundle. Files are
/// read once when the source is loaded.
#[derive(Debug, Clone)]
pub struct PropertiesDefaults {
    dir: PathBuf,
    inner: StaticDefaults,
}

impl PropertiesDefaults {
    /// Loads every bundle found directly under `dir`.
    ///
    /// # Errors
    ///
    /// Returns a `LoadingDefault` error if the directory cannot be listed
    /// or a bundle cannot be parsed.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let entries = std::fs::read_dir(&dir).map_err(|e| {
            ConfigurationError::loading_default_with_cause(
                format!("Couldn't read default bundle directory: {}", dir.display()),
                e,
            )
        })?;

        let mut inner = StaticDefaults::new();

        for entry in entries {
            let path = entry
                .map_err(|e| {
                    ConfigurationError::loading_default_with_cause(
                        format!("Couldn't read default bundle directory: {}", dir.display()),
                        e,
                    )
                })?
                .path();

            if path.extension().and_then(|e| e.to_str()) != Some(BUNDLE_EXTENSION) {
                continue;
            }

            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let bundle = read_bundle(name, &path)?;
            debug!(bundle = %name, values = bundle.len(), "Loaded default bundle");
            inner.insert(bundle);
        }

        info!(dir = %dir.display(), bundles = inner.len(), "Default bundles loaded");

        Ok(Self { dir, inner })
    }

    /// Returns the directory bundles were loaded from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the number of loaded bundles.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if no bundle was found.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl DefaultSource for PropertiesDefaults {
    fn bundle(&self, variation_name: &str) -> Option<DefaultBundle> {
        self.inner.bundle(variation_name)
    }
}

fn read_bundle(name: &str, path: &Path) -> Result<DefaultBundle> {
    let file = File::open(path).map_err(|e| {
        ConfigurationError::loading_default_with_cause(
            format!("Couldn't load configuration resource: {}", name),
            e,
        )
    })?;

    let values = java_properties::read(BufReader::new(file)).map_err(|e| {
        ConfigurationError::loading_default_with_cause(
            format!("Couldn't parse configuration resource: {}", name),
            e,
        )
    })?;

    let mut values: IndexMap<String, String> = values.into_iter().collect();
    values.sort_keys();

    Ok(DefaultBundle {
        name: name.to_string(),
        values,
    })
}
