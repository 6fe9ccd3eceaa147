use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::app_state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    model: String,
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let model = if state.titles.model_configured() {
        "configured"
    } else {
        "missing_api_key"
    };
    debug!(model, "health check");

    Json(HealthResponse {
        status: "OK".to_string(),
        model: model.to_string(),
    })
}
