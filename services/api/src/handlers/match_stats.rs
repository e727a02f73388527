use crate::dataset::load_matches;
use crate::error::ApiError;
use crate::models::{MatchStatsQuery, MatchStatsResponse, ShotBreakdown};
use crate::state::AppState;
use crate::stats::xg;
use axum::{
    extract::{Query, State},
    Json,
};

pub async fn get_match_stats(
    State(state): State<AppState>,
    Query(query): Query<MatchStatsQuery>,
) -> Result<Json<MatchStatsResponse>, ApiError> {
    let match_id = query
        .match_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("match_id query parameter is required".to_string()))?;

    // Combined history: the id may belong to any season on file.
    let matches = load_matches(state.data.as_ref(), None)?;
    let record = matches
        .into_iter()
        .find(|m| m.match_id == match_id)
        .ok_or_else(|| ApiError::NotFound(format!("No match with id '{}'", match_id)))?;

    // Upstream failure degrades to "stats unavailable", never an error.
    let response = match state.stats_client.fetch(match_id, record.season).await {
        Some(stats) => MatchStatsResponse {
            match_id: record.match_id,
            season: record.season,
            home_team: record.home_team,
            away_team: record.away_team,
            stats_available: true,
            xg: Some(xg::estimate(&stats.home, &stats.away)),
            shots: Some(ShotBreakdown {
                home: stats.home,
                away: stats.away,
            }),
        },
        None => MatchStatsResponse {
            match_id: record.match_id,
            season: record.season,
            home_team: record.home_team,
            away_team: record.away_team,
            stats_available: false,
            shots: None,
            xg: None,
        },
    };
    Ok(Json(response))
}
