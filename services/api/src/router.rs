//! Route table and layer stack

use crate::error::ApiError;
use crate::govern::pipeline::govern;
use crate::handlers::{analytics, health, match_stats, matches, odds, standings, teams};
use crate::state::AppState;
use axum::{http::Method, middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/matches", get(matches::get_matches))
        .route("/standings", get(standings::get_standings))
        .route("/teams", get(teams::get_teams))
        .route("/match-stats", get(match_stats::get_match_stats))
        .route("/odds", get(odds::get_odds))
        .route("/health", get(health::get_health))
        .route("/analytics", get(analytics::get_analytics))
        .fallback(unknown_route)
        // Governance runs inside CORS so preflight never reaches it.
        .layer(middleware::from_fn_with_state(state.clone(), govern))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(Any)
}

async fn unknown_route() -> ApiError {
    ApiError::NotFound("No such route".to_string())
}
