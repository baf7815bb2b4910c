//! Configuration identity: an `id` plus an optional `variation`.
//!
//! Variations arrive from many places (typed callers, stored documents, URL
//! query strings) and may be missing, `null`, blank or the literal string
//! `"null"`. All of those mean "no variation" and canonicalize to `""`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Literal produced by clients that format a missing variation into a URL.
const NULL_LITERAL: &str = "null";

/// Canonicalizes a variation.
///
/// `None`, blank strings and the literal `"null"` become `""`; any other
/// value is returned trimmed.
///
/// # Example
///
/// ```
/// use confvault_core::canonicalize_variation;
///
/// assert_eq!(canonicalize_variation(None), "");
/// assert_eq!(canonicalize_variation(Some("null")), "");
/// assert_eq!(canonicalize_variation(Some("  ")), "");
/// assert_eq!(canonicalize_variation(Some(" A ")), "A");
/// ```
pub fn canonicalize_variation(variation: Option<&str>) -> String {
    match variation.map(str::trim) {
        None => String::new(),
        Some(v) if v.is_empty() || v == NULL_LITERAL => String::new(),
        Some(v) => v.to_string(),
    }
}

/// Builds the name used to look up default-value bundles.
///
/// Returns `id` alone when the variation canonicalizes to empty, otherwise
/// `id-variation`.
///
/// # Example
///
/// ```
/// use confvault_core::build_variation_name;
///
/// assert_eq!(build_variation_name("cfg1", None), "cfg1");
/// assert_eq!(build_variation_name("cfg1", Some("A")), "cfg1-A");
/// ```
pub fn build_variation_name(id: &str, variation: Option<&str>) -> String {
    let variation = canonicalize_variation(variation);
    if variation.is_empty() {
        id.to_string()
    } else {
        format!("{}-{}", id, variation)
    }
}

/// Builds the key used by caches and as composite storage key.
///
/// # Example
///
/// ```
/// use confvault_core::build_cache_key;
///
/// assert_eq!(build_cache_key("cfg1", None), "cfg1_");
/// assert_eq!(build_cache_key("cfg1", Some("B")), "cfg1_B");
/// ```
pub fn build_cache_key(id: &str, variation: Option<&str>) -> String {
    format!("{}_{}", id, canonicalize_variation(variation))
}

/// Identity of a stored configuration.
///
/// The variation is always kept in canonical form, so two identities are
/// equal exactly when they name the same stored entity.
///
/// Serializes as `{"id": "...", "variation": "..."}`; the variation is
/// written as `""` when empty and a stored `null` reads back as `""`.
///
/// # Example
///
/// ```
/// use confvault_core::ConfigIdentity;
///
/// let a = ConfigIdentity::new("payments", Some("null"));
/// let b = ConfigIdentity::new("payments", None);
/// assert_eq!(a, b);
/// assert_eq!(a.cache_key(), "payments_");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigIdentity {
    #[serde(default)]
    id: String,

    #[serde(default, deserialize_with = "deserialize_variation")]
    variation: String,
}

impl ConfigIdentity {
    /// Creates a new identity, canonicalizing the variation.
    pub fn new(id: impl Into<String>, variation: Option<&str>) -> Self {
        Self {
            id: id.into(),
            variation: canonicalize_variation(variation),
        }
    }

    /// Returns the configuration id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Sets the configuration id.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Returns the canonical variation; `""` when unset.
    pub fn variation(&self) -> &str {
        &self.variation
    }

    /// Sets the variation, canonicalizing it.
    pub fn set_variation(&mut self, variation: Option<&str>) {
        self.variation = canonicalize_variation(variation);
    }

    /// Returns true if no variation is set.
    pub fn has_variation(&self) -> bool {
        !self.variation.is_empty()
    }

    /// Returns the default-bundle name for this identity.
    pub fn variation_name(&self) -> String {
        build_variation_name(&self.id, Some(&self.variation))
    }

    /// Returns the cache/storage key for this identity.
    pub fn cache_key(&self) -> String {
        build_cache_key(&self.id, Some(&self.variation))
    }
}

impl fmt::Display for ConfigIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.variation_name())
    }
}

fn deserialize_variation<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(canonicalize_variation(raw.as_deref()))
}
