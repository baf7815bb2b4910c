use std::net::SocketAddr;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;

use crate::handlers::{
    cache::invalidate_cache,
    configuration::{remove_configuration, save_configuration, view_configuration},
    health::health_check,
    metrics::metrics_handler,
};
use crate::middleware::{LoggingLayer, RequestIdLayer};
use crate::state::AppState;

/// Routes served under the configurable base path.
fn configuration_routes() -> Router<AppState> {
    Router::new()
        .route("/view", get(view_configuration))
        .route("/save", post(save_configuration))
        .route("/remove", delete(remove_configuration))
        .route("/cache", delete(invalidate_cache))
}

fn app_routes(state: AppState, base_path: &str) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest(base_path, configuration_routes())
        .with_state(state)
}

fn with_middleware(router: Router) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(RequestIdLayer)
        .layer(LoggingLayer);

    router
        .layer(middleware::from_fn(
            crate::metrics::http::http_metrics_middleware,
        ))
        .layer(middleware_stack)
}

/// Creates the application router. `base_path` must start with `/` and
/// must not end with one (see `ServerSettings::validate`).
pub fn create_router(state: AppState, base_path: &str) -> Router {
    with_middleware(app_routes(state, base_path))
}

/// Creates the application router plus the `/metrics` endpoint.
pub fn create_router_with_metrics(
    state: AppState,
    base_path: &str,
    prometheus_handle: PrometheusHandle,
) -> Router {
    // Router for metrics endpoint (different state)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    with_middleware(app_routes(state, base_path).merge(metrics_router))
}

/// Serves `app` on `addr` until Ctrl+C or SIGTERM.
pub async fn run_server(addr: SocketAddr, app: Router) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
