//! # Confvault Service
//!
//! The get-or-create-default resolution algorithm and the time-bounded cache
//! shared by every Confvault backend.
//!
//! ## Resolution
//!
//! 1. Canonicalize the variation
//! 2. Look in the cache (when enabled)
//! 3. Look in the store
//! 4. On a miss, materialize the type's defaults and persist them
//!
//! The JSON path stops after step 3: without a type there are no defaults,
//! so a miss is reported as absence rather than an error.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use confvault_core::PropertiesDefaults;
//! use confvault_service::{ConfigService, ServiceConfig};
//! use confvault_store::FileStore;
//!
//! let store = Arc::new(FileStore::new("/var/lib/confvault"));
//! store.open().await?;
//!
//! let service = ConfigService::new(
//!     store,
//!     Arc::new(PropertiesDefaults::load("/etc/confvault/defaults")?),
//!     ServiceConfig::default(),
//! );
//!
//! let json = service.get_as_json("payments", Some("eu")).await?;
//! ```

pub mod cache;
pub mod config;
pub mod metrics;
pub mod service;

// Re-exports
pub use cache::{CacheConfig, ConfigCache};
pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use metrics::{CacheMetrics, register_cache_metrics};
pub use service::ConfigService;
