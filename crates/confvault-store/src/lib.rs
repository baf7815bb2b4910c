//! # Confvault Store
//!
//! Storage backends for Confvault.
//!
//! A backend only needs to find, upsert and delete records keyed by
//! `(id, variation)`. Resolution, default materialization and caching live
//! in `confvault-service` and are shared by every backend.
//!
//! ## Backends
//!
//! - [`MemoryStore`] - process-local map
//! - [`FileStore`] - one JSON file per record, atomic replace on write
//!
//! ## Example
//!
//! ```ignore
//! use confvault_store::{ConfigStore, FileStore, StoredRecord};
//!
//! let store = FileStore::new("/var/lib/confvault");
//! store.open().await?;
//!
//! store.upsert(StoredRecord::new("payments", Some("eu"), r#"{"id":"payments"}"#)).await?;
//! let record = store.find_one("payments", "eu").await?;
//!
//! store.close().await?;
//! ```

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

// Re-exports
pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{ConfigStore, StoredRecord};

// Re-export confvault_core for consumers
pub use confvault_core;
