//! The capability set every storable configuration type implements.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::defaults::DefaultSource;
use crate::error::Result;
use crate::identity::ConfigIdentity;

/// A storable configuration.
///
/// Implementors embed a [`ConfigIdentity`] (usually with
/// `#[serde(flatten)]` so `id` and `variation` appear at the top level of
/// the serialized form) and know how to populate themselves from a
/// default bundle.
///
/// # Example
///
/// ```
/// use confvault_core::{ConfigIdentity, Configuration, DefaultSource, Result};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Default, Serialize, Deserialize)]
/// struct Greeting {
///     #[serde(flatten)]
///     identity: ConfigIdentity,
///     text: Option<String>,
/// }
///
/// impl Configuration for Greeting {
///     fn identity(&self) -> &ConfigIdentity {
///         &self.identity
///     }
///
///     fn identity_mut(&mut self) -> &mut ConfigIdentity {
///         &mut self.identity
///     }
///
///     fn reset_to_default(&mut self, defaults: &dyn DefaultSource) -> Result<()> {
///         let bundle = defaults.require_bundle(&self.variation_name())?;
///         self.text = Some(bundle.require("text")?.to_string());
///         Ok(())
///     }
/// }
/// ```
pub trait Configuration: Serialize + DeserializeOwned + Default + Send + Sync + 'static {
    /// Returns the identity of this configuration.
    fn identity(&self) -> &ConfigIdentity;

    /// Returns the identity mutably.
    fn identity_mut(&mut self) -> &mut ConfigIdentity;

    /// Populates this instance from the defaults registered for
    /// [`variation_name`](Configuration::variation_name).
    ///
    /// # Errors
    ///
    /// Fails with `LoadingDefault` when no bundle exists for the variation
    /// name or a required value is missing.
    fn reset_to_default(&mut self, defaults: &dyn DefaultSource) -> Result<()>;

    /// Returns the configuration id.
    fn id(&self) -> &str {
        self.identity().id()
    }

    /// Sets the configuration id.
    fn set_id(&mut self, id: &str) {
        self.identity_mut().set_id(id);
    }

    /// Returns the variation, never null; `""` when unset.
    fn variation(&self) -> &str {
        self.identity().variation()
    }

    /// Sets the variation (canonicalized).
    fn set_variation(&mut self, variation: Option<&str>) {
        self.identity_mut().set_variation(variation);
    }

    /// Returns `id` or `id-variation`, the key of the default bundle.
    fn variation_name(&self) -> String {
        self.identity().variation_name()
    }

    /// Returns the cache/storage key.
    fn cache_key(&self) -> String {
        self.identity().cache_key()
    }
}

/// Creates a fresh instance of `T` carrying the given identity.
pub fn with_identity<T: Configuration>(identity: ConfigIdentity) -> T {
    let mut configuration = T::default();
    *configuration.identity_mut() = identity;
    configuration
}

/// A schemaless configuration whose fields are arbitrary JSON values.
///
/// Defaults copy every value of the bundle as a JSON string field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericConfiguration {
    #[serde(flatten)]
    identity: ConfigIdentity,

    #[serde(flatten)]
    fields: IndexMap<String, serde_json::Value>,
}

impl GenericConfiguration {
    /// Creates an empty configuration for the given identity.
    pub fn new(id: impl Into<String>, variation: Option<&str>) -> Self {
        Self {
            identity: ConfigIdentity::new(id, variation),
            fields: IndexMap::new(),
        }
    }

    /// Returns a field value.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.get(key)
    }

    /// Sets a field value. `id` and `variation` are reserved and ignored.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        let key = key.into();
        if key == "id" || key == "variation" {
            return;
        }
        self.fields.insert(key, value.into());
    }

    /// Returns all non-identity fields.
    pub fn fields(&self) -> &IndexMap<String, serde_json::Value> {
        &self.fields
    }
}

impl Configuration for GenericConfiguration {
    fn identity(&self) -> &ConfigIdentity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut ConfigIdentity {
        &mut self.identity
    }

    fn reset_to_default(&mut self, defaults: &dyn DefaultSource) -> Result<()> {
        let bundle = defaults.require_bundle(&self.variation_name())?;
        self.fields.clear();
        for (key, value) in bundle.iter() {
            self.set(key, value);
        }
        Ok(())
    }
}
