use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /health. 503 when the store does not answer its health check.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let service = state.service();
    let store = service.store().name().to_string();

    match service.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "UP",
                store,
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(store = %store, error = %e, "Store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "DOWN",
                    store,
                    error: Some(e.to_string()),
                }),
            )
        },
    }
}
