//! Query parameters and response envelopes
//!
//! Query values arrive as raw strings so malformed input produces this
//! service's 400 shape instead of the framework's default rejection.

use crate::error::ApiError;
use cpl_types::matches::MatchRecord;
use cpl_types::odds::OddsRecord;
use cpl_types::standings::{StandingsSource, TeamStanding};
use cpl_types::stats::XgEstimate;
use cpl_types::teams::TeamInfo;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 500;

#[derive(Debug, Default, Deserialize)]
pub struct MatchesQuery {
    pub season: Option<String>,
    pub team: Option<String>,
    pub competition: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StandingsQuery {
    pub season: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TeamsQuery {
    pub active_only: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MatchStatsQuery {
    pub match_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OddsQuery {
    pub season: Option<String>,
    pub team: Option<String>,
    pub bookmaker: Option<String>,
    pub match_id: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Pagination window parsed from raw `limit`/`offset` strings.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> Result<Self, ApiError> {
        let limit = match limit {
            None => DEFAULT_LIMIT,
            Some(raw) => {
                let value: usize = raw.parse().map_err(|_| {
                    ApiError::Validation(format!("limit must be an integer, got '{}'", raw))
                })?;
                if value == 0 || value > MAX_LIMIT {
                    return Err(ApiError::Validation(format!(
                        "limit must be between 1 and {}",
                        MAX_LIMIT
                    )));
                }
                value
            }
        };
        let offset = match offset {
            None => 0,
            Some(raw) => raw.parse().map_err(|_| {
                ApiError::Validation(format!("offset must be a non-negative integer, got '{}'", raw))
            })?,
        };
        Ok(Self { limit, offset })
    }

    /// Apply the window; returns (total before paging, page).
    pub fn apply<T>(&self, items: Vec<T>) -> (usize, Vec<T>) {
        let total = items.len();
        let page = items
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect();
        (total, page)
    }
}

/// A 4-digit season year parsed from a raw query value.
pub fn parse_season(raw: &str) -> Result<i32, ApiError> {
    let year: i32 = raw
        .parse()
        .map_err(|_| ApiError::Validation(format!("season must be a year, got '{}'", raw)))?;
    if !(1900..=2100).contains(&year) {
        return Err(ApiError::Validation(format!(
            "season out of range: {}",
            year
        )));
    }
    Ok(year)
}

/// Lenient boolean query flag: true / 1 / yes.
pub fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(str::trim).map(str::to_ascii_lowercase).as_deref(),
        Some("true") | Some("1") | Some("yes")
    )
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub count: usize,
    pub total: usize,
    pub matches: Vec<MatchRecord>,
}

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub season: i32,
    pub source: StandingsSource,
    pub standings: Vec<TeamStanding>,
}

#[derive(Debug, Serialize)]
pub struct TeamsResponse {
    pub count: usize,
    pub teams: Vec<TeamInfo>,
}

#[derive(Debug, Serialize)]
pub struct OddsResponse {
    pub count: usize,
    pub total: usize,
    pub odds: Vec<OddsRecord>,
}

#[derive(Debug, Serialize)]
pub struct MatchStatsResponse {
    pub match_id: String,
    pub season: i32,
    pub home_team: String,
    pub away_team: String,
    pub stats_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shots: Option<ShotBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xg: Option<XgEstimate>,
}

#[derive(Debug, Serialize)]
pub struct ShotBreakdown {
    pub home: cpl_types::stats::ShotCounts,
    pub away: cpl_types::stats::ShotCounts,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults() {
        let page = Page::parse(None, None).unwrap();
        assert_eq!(page.limit, 50);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn page_rejects_out_of_range_limit() {
        assert!(Page::parse(Some("0"), None).is_err());
        assert!(Page::parse(Some("501"), None).is_err());
        assert!(Page::parse(Some("nope"), None).is_err());
        assert!(Page::parse(Some("500"), None).is_ok());
    }

    #[test]
    fn page_rejects_negative_offset() {
        assert!(Page::parse(None, Some("-1")).is_err());
        assert_eq!(Page::parse(None, Some("10")).unwrap().offset, 10);
    }

    #[test]
    fn page_apply_windows_items() {
        let page = Page {
            limit: 2,
            offset: 1,
        };
        let (total, window) = page.apply(vec![1, 2, 3, 4]);
        assert_eq!(total, 4);
        assert_eq!(window, vec![2, 3]);
    }

    #[test]
    fn season_validation() {
        assert_eq!(parse_season("2024").unwrap(), 2024);
        assert!(parse_season("24").is_err());
        assert!(parse_season("soon").is_err());
    }

    #[test]
    fn flag_parsing_is_lenient() {
        assert!(parse_flag(Some("true")));
        assert!(parse_flag(Some("1")));
        assert!(parse_flag(Some("YES")));
        assert!(!parse_flag(Some("false")));
        assert!(!parse_flag(None));
    }
}
