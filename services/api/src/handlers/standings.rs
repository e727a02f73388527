use crate::error::ApiError;
use crate::models::{parse_season, StandingsQuery, StandingsResponse};
use crate::state::AppState;
use crate::stats::standings::season_standings;
use axum::{
    extract::{Query, State},
    Json,
};

pub async fn get_standings(
    State(state): State<AppState>,
    Query(query): Query<StandingsQuery>,
) -> Result<Json<StandingsResponse>, ApiError> {
    let season = query
        .season
        .as_deref()
        .ok_or_else(|| ApiError::Validation("season query parameter is required".to_string()))
        .and_then(parse_season)?;

    let table = season_standings(state.data.as_ref(), season)?;
    Ok(Json(StandingsResponse {
        season,
        source: table.source,
        standings: table.standings,
    }))
}
