//! Confvault Core - Identity, contract and error types
//!
//! This crate provides the foundational types shared by every Confvault
//! backend: how a configuration is identified, what a storable
//! configuration must be able to do, where default values come from, and
//! how failures are reported.

pub mod contract;
pub mod defaults;
pub mod error;
pub mod identity;
pub mod resolution;

pub use contract::{Configuration, GenericConfiguration, with_identity};
pub use defaults::{DefaultBundle, DefaultSource, PropertiesDefaults, StaticDefaults};
pub use error::{ConfigurationError, ErrorCode, Result};
pub use identity::{
    ConfigIdentity, build_cache_key, build_variation_name, canonicalize_variation,
};
pub use resolution::Resolution;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_semver() {
        let v = version();
        assert_eq!(v.split('.').count(), 3, "Version should be semver");
    }
}
