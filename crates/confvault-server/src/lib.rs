//! Confvault Server - HTTP server for Confvault
//!
//! Exposes the configuration service over REST:
//!
//! | Method | Path | |
//! |--------|------|-|
//! | GET | `{base}/view?id=&variation=` | stored JSON, empty body when absent |
//! | POST | `{base}/save` | body is the configuration JSON |
//! | DELETE | `{base}/remove?id=&variation=` | |
//! | DELETE | `{base}/cache` | drops every cache entry |
//! | GET | `/health` | store health |
//! | GET | `/metrics` | Prometheus exposition |
//!
//! `{base}` defaults to `/configuration`. Every configuration failure is
//! answered with 400 and a JSON body carrying the error code.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod settings;
pub mod state;

pub use error::AppError;
pub use server::{create_router, create_router_with_metrics, run_server};
pub use settings::{ServerSettings, SettingsError, StoreKind};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
