//! Confvault server binary.
//!
//! Usage: `confvault-server [settings.toml]`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use confvault_core::{DefaultSource, PropertiesDefaults, StaticDefaults};
use confvault_server::{AppState, ServerSettings, StoreKind, create_router_with_metrics, run_server};
use confvault_service::ConfigService;
use confvault_store::{ConfigStore, FileStore, MemoryStore};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = ServerSettings::load(settings_path.as_deref()).context("loading settings")?;
    let addr = settings.bind_addr()?;

    tracing::info!(
        "Starting Confvault Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let store = build_store(&settings)?;
    store
        .open()
        .await
        .with_context(|| format!("opening {} store", store.name()))?;
    tracing::info!(store = store.name(), "Store opened");

    let defaults = build_defaults(&settings)?;
    let service = ConfigService::new(store.clone(), defaults, settings.service_config()?);

    let prometheus_handle = confvault_server::metrics::init_metrics()?;
    let app = create_router_with_metrics(
        AppState::new(service),
        &settings.server.base_path,
        prometheus_handle,
    );

    let served = run_server(addr, app).await;

    // Close the store even if serving failed
    if let Err(e) = store.close().await {
        tracing::error!(error = %e, "Failed to close store");
    }
    tracing::info!("Server stopped");

    served.context("serving HTTP")
}

fn build_store(settings: &ServerSettings) -> anyhow::Result<Arc<dyn ConfigStore>> {
    let store: Arc<dyn ConfigStore> = match settings.store.kind {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::File => {
            let data_dir = settings
                .store
                .data_dir
                .clone()
                .context("store.data_dir is required for the file store")?;
            tracing::info!(data_dir = %data_dir.display(), "Using file store");
            Arc::new(FileStore::new(data_dir))
        },
    };
    Ok(store)
}

fn build_defaults(settings: &ServerSettings) -> anyhow::Result<Arc<dyn DefaultSource>> {
    match &settings.defaults.dir {
        Some(dir) => {
            let defaults = PropertiesDefaults::load(dir)
                .with_context(|| format!("loading default bundles from {}", dir.display()))?;
            Ok(Arc::new(defaults))
        },
        None => {
            tracing::info!("No default bundles configured");
            Ok(Arc::new(StaticDefaults::new()))
        },
    }
}
