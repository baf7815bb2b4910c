#![allow(dead_code)]
use confvault_core::{
    ConfigIdentity, Configuration, DefaultBundle, DefaultSource, Result, StaticDefaults,
};
use serde::{Deserialize, Serialize};

/// Configuration with a single `test` field, as used across the suite.
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
