use crate::dataset::{decode, DatasetName};
use crate::error::ApiError;
use crate::models::{parse_flag, TeamsQuery, TeamsResponse};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};

pub async fn get_teams(
    State(state): State<AppState>,
    Query(query): Query<TeamsQuery>,
) -> Result<Json<TeamsResponse>, ApiError> {
    let mut teams = decode::decode_teams(&state.data.read(&DatasetName::Teams)?)?;

    if parse_flag(query.active_only.as_deref()) {
        teams.retain(|team| team.active);
    }

    Ok(Json(TeamsResponse {
        count: teams.len(),
        teams,
    }))
}
