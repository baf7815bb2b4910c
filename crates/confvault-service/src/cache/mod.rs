//! Cache module for Confvault.
//!
//! A single map of resolved configurations guarded by a mutex, with one
//! global refresh timestamp. When the refresh interval elapses the whole
//! cache is dropped at once.

pub mod config_cache;

// Re-exports
pub use config_cache::{CacheConfig, ConfigCache};
