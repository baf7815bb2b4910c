//! Metrics module for the Confvault server.
//!
//! Cache metrics are recorded by `confvault-service`; this module adds the
//! HTTP metrics and installs the Prometheus recorder.

pub mod http;
pub mod setup;

pub use setup::{MetricsError, init_metrics};
