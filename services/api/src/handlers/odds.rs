use crate::dataset::{decode, DatasetName};
use crate::error::ApiError;
use crate::models::{parse_season, OddsQuery, OddsResponse, Page};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use cpl_types::odds::OddsRecord;

pub async fn get_odds(
    State(state): State<AppState>,
    Query(query): Query<OddsQuery>,
) -> Result<Json<OddsResponse>, ApiError> {
    let season = query.season.as_deref().map(parse_season).transpose()?;
    let page = Page::parse(query.limit.as_deref(), query.offset.as_deref())?;

    let mut odds: Vec<OddsRecord> = match season {
        Some(year) => decode::decode_odds(&state.data.read(&DatasetName::Odds(year))?)?,
        None => {
            let mut all = Vec::new();
            for year in state.data.odds_seasons()? {
                all.extend(decode::decode_odds(
                    &state.data.read(&DatasetName::Odds(year))?,
                )?);
            }
            all
        }
    };

    if let Some(team) = &query.team {
        odds.retain(|o| {
            o.home_team.eq_ignore_ascii_case(team) || o.away_team.eq_ignore_ascii_case(team)
        });
    }
    if let Some(bookmaker) = &query.bookmaker {
        odds.retain(|o| o.bookmaker.eq_ignore_ascii_case(bookmaker));
    }
    if let Some(match_id) = &query.match_id {
        odds.retain(|o| o.match_id == *match_id);
    }

    let (total, window) = page.apply(odds);
    Ok(Json(OddsResponse {
        count: window.len(),
        total,
        odds: window,
    }))
}
