//! Cache invalidation endpoint handler.

use axum::{extract::State, response::Json};
use serde::Serialize;
use tracing::instrument;

use crate::state::AppState;

/// Response para operaciones de invalidacion.
#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    /// Numero de entries invalidadas.
    pub invalidated: usize,
    /// Mensaje descriptivo.
    pub message: String,
}

/// DELETE {base}/cache
/// Invalida toda la cache. Con el cache deshabilitado responde 0.
#[instrument(skip_all)]
pub async fn invalidate_cache(State(state): State<AppState>) -> Json<InvalidateResponse> {
    let count = state.service().invalidate_cache();

    Json(InvalidateResponse {
        invalidated: count,
        message: format!("Invalidated {} cache entries", count),
    })
}
