use crate::govern::analytics::AnalyticsSummary;
use crate::state::AppState;
use axum::{extract::State, http::HeaderMap, Json};

/// Usage summary. The detailed recent-request view requires the configured
/// admin key in `x-admin-key`; with no key configured it is never served.
pub async fn get_analytics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<AnalyticsSummary> {
    let privileged = match (&state.config.admin_key, headers.get("x-admin-key")) {
        (Some(expected), Some(provided)) => provided
            .to_str()
            .map(|value| value == expected)
            .unwrap_or(false),
        _ => false,
    };

    Json(state.analytics.summarize(privileged))
}
