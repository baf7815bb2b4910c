//! Metrics setup and initialization.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;
use tracing::info;

use super::http::register_http_metrics;

/// Buckets de los histogramas, en segundos. Van de 100us (hits de cache)
/// a 10s (timeout por defecto del store).
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Error installing the metrics recorder.
#[derive(Debug, Error)]
#[error("failed to initialize metrics: {0}")]
pub struct MetricsError(#[from] BuildError);

/// Instala el recorder de Prometheus, describe las metricas y retorna el
/// handle para el endpoint. Solo puede llamarse una vez por proceso.
pub fn init_metrics() -> Result<PrometheusHandle, MetricsError> {
    let handle = PrometheusBuilder::new()
        .set_buckets(LATENCY_BUCKETS)?
        .install_recorder()?;

    register_http_metrics();
    confvault_service::register_cache_metrics();

    info!("Metrics system initialized");
    Ok(handle)
}
