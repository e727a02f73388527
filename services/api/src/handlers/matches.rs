use crate::dataset::load_matches;
use crate::error::ApiError;
use crate::models::{parse_season, MatchesQuery, MatchesResponse, Page};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};

pub async fn get_matches(
    State(state): State<AppState>,
    Query(query): Query<MatchesQuery>,
) -> Result<Json<MatchesResponse>, ApiError> {
    let season = query.season.as_deref().map(parse_season).transpose()?;
    let page = Page::parse(query.limit.as_deref(), query.offset.as_deref())?;

    let mut matches = load_matches(state.data.as_ref(), season)?;

    if let Some(team) = &query.team {
        matches.retain(|m| m.involves(team));
    }
    if let Some(competition) = &query.competition {
        matches.retain(|m| m.competition.eq_ignore_ascii_case(competition));
    }

    let (total, window) = page.apply(matches);
    Ok(Json(MatchesResponse {
        count: window.len(),
        total,
        matches: window,
    }))
}
