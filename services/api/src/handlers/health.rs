use crate::models::HealthResponse;
use crate::state::AppState;
use axum::{extract::State, Json};

pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "cpl-api",
        version: crate::SERVICE_VERSION,
        uptime_seconds: state.analytics.uptime_seconds(),
    })
}
