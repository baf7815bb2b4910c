//! HTTP handlers.

pub mod cache;
pub mod configuration;
pub mod health;
pub mod metrics;
