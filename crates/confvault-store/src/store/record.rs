//! Stored record type.

use confvault_core::{ConfigIdentity, build_cache_key, canonicalize_variation};
use serde::{Deserialize, Serialize};

/// A configuration as kept by a backend.
///
/// The identity fields are stored next to the document so backends can
/// query by them; `document` holds the full serialized configuration and is
/// returned verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// The configuration id.
    id: String,

    /// The canonical variation.
    variation: String,

    /// The serialized configuration JSON.
    #[serde(rename = "configuration")]
    document: String,
}

impl StoredRecord {
    /// Creates a new record. The variation is canonicalized.
    pub fn new(id: impl Into<String>, variation: Option<&str>, document: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            variation: canonicalize_variation(variation),
            document: document.into(),
        }
    }

    /// Creates a record for the given identity.
    pub fn for_identity(identity: &ConfigIdentity, document: impl Into<String>) -> Self {
        Self {
            id: identity.id().to_string(),
            variation: identity.variation().to_string(),
            document: document.into(),
        }
    }

    /// Returns the configuration id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the canonical variation.
    pub fn variation(&self) -> &str {
        &self.variation
    }

    /// Returns the stored JSON document.
    pub fn document(&self) -> &str {
        &self.document
    }

    /// Consumes the record, returning the JSON document.
    pub fn into_document(self) -> String {
        self.document
    }

    /// Returns the structured identity of this record.
    pub fn identity(&self) -> ConfigIdentity {
        ConfigIdentity::new(self.id.clone(), Some(&self.variation))
    }

    /// Returns the flattened cache key. Not unique across identities;
    /// backends must not use it as a primary key.
    pub fn key(&self) -> String {
        build_cache_key(&self.id, Some(&self.variation))
    }

    /// Returns true if this record belongs to `(id, variation)`.
    pub fn matches(&self, id: &str, variation: &str) -> bool {
        self.id == id && self.variation == canonicalize_variation(Some(variation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canonicalizes() {
        let record = StoredRecord::new("cfg1", Some("null"), "{}");
        assert_eq!(record.variation(), "");
        assert_eq!(record.key(), "cfg1_");
        assert!(record.matches("cfg1", ""));
        assert!(!record.matches("cfg1", "A"));
    }

    #[test]
    fn test_identity_keeps_fields_apart() {
        let plain = StoredRecord::new("a_b", None, "{}");
        let varied = StoredRecord::new("a", Some("b_"), "{}");

        assert_eq!(plain.key(), varied.key());
        assert_ne!(plain.identity(), varied.identity());
    }

    #[test]
    fn test_envelope_layout() {
        let record = StoredRecord::new("cfg1", Some("A"), r#"{"id":"cfg1"}"#);
        let json = serde_json::to_string(&record).unwrap();

        assert_eq!(
            json,
            r#"{"id":"cfg1","variation":"A","configuration":"{\"id\":\"cfg1\"}"}"#
        );
    }
}
