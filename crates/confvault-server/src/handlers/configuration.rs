//! Configuration endpoint handlers.

use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::{IdentityQuery, Principal};
use crate::state::AppState;

/// Handler for GET {base}/view.
///
/// Responds with the stored JSON, or an empty 200 when nothing is stored.
#[instrument(skip_all, fields(id = ?query.id, variation = ?query.variation))]
pub async fn view_configuration(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<IdentityQuery>,
) -> Result<Response, AppError> {
    let id = query.id()?;

    tracing::debug!(authenticated = principal.is_present(), "Fetching configuration");

    match state.service().get_as_json(id, query.variation()).await? {
        Some(json) => Ok(([(header::CONTENT_TYPE, "application/json")], json).into_response()),
        None => Ok(StatusCode::OK.into_response()),
    }
}

/// Handler for POST {base}/save. The body is the configuration JSON.
#[instrument(skip_all)]
pub async fn save_configuration(
    State(state): State<AppState>,
    principal: Principal,
    body: String,
) -> Result<StatusCode, AppError> {
    tracing::debug!(authenticated = principal.is_present(), "Saving configuration");

    state.service().save_as_json(&body).await?;
    Ok(StatusCode::OK)
}

/// Handler for DELETE {base}/remove.
#[instrument(skip_all, fields(id = ?query.id, variation = ?query.variation))]
pub async fn remove_configuration(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<IdentityQuery>,
) -> Result<StatusCode, AppError> {
    let id = query.id()?;

    tracing::debug!(authenticated = principal.is_present(), "Removing configuration");

    state.service().remove(id, query.variation()).await?;
    Ok(StatusCode::OK)
}
