//! Schema-validated CSV decoding
//!
//! Each dataset declares its required headers and numeric-coercion columns
//! once, up front. A numeric cell that fails coercion decodes to `None`,
//! never zero, so downstream consumers can tell "no score" from "0". Rows
//! missing a required key (date, match id) are dropped with a debug log.
//!
//! Parsing is delegated to the `csv` reader, which handles both line-ending
//! conventions, separator characters inside quoted fields, and doubled
//! quotes as literal quote characters.

use crate::error::ApiError;
use cpl_types::matches::{MatchRecord, MatchStatus};
use cpl_types::odds::OddsRecord;
use cpl_types::standings::TeamStanding;
use cpl_types::teams::TeamInfo;
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;

/// Header map for one CSV blob. Column lookup is case-insensitive and
/// whitespace-tolerant.
struct Schema {
    index: HashMap<String, usize>,
}

impl Schema {
    fn read(raw: &str) -> Result<(Self, Vec<StringRecord>), ApiError> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_reader(raw.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| ApiError::DataUnavailable(format!("malformed csv header: {}", e)))?
            .clone();

        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
            .collect();

        let rows = reader
            .records()
            .filter_map(|row| match row {
                Ok(row) => Some(row),
                Err(e) => {
                    tracing::debug!("skipping malformed csv row: {}", e);
                    None
                }
            })
            .collect();

        Ok((Self { index }, rows))
    }

    fn require(&self, columns: &[&str]) -> Result<(), ApiError> {
        for column in columns {
            if !self.index.contains_key(*column) {
                return Err(ApiError::DataUnavailable(format!(
                    "dataset missing required column '{}'",
                    column
                )));
            }
        }
        Ok(())
    }

    /// Trimmed, non-empty cell text.
    fn text(&self, row: &StringRecord, column: &str) -> Option<String> {
        let value = row.get(*self.index.get(column)?)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    /// Integer coercion; any failure yields `None`, not zero.
    fn int(&self, row: &StringRecord, column: &str) -> Option<i64> {
        self.text(row, column)?.parse().ok()
    }

    fn float(&self, row: &StringRecord, column: &str) -> Option<f64> {
        self.text(row, column)?.parse().ok()
    }
}

fn goals(schema: &Schema, row: &StringRecord, column: &str) -> Option<u32> {
    schema
        .int(row, column)
        .and_then(|v| u32::try_from(v).ok())
}

/// Decode one season file of match results.
pub fn decode_matches(raw: &str) -> Result<Vec<MatchRecord>, ApiError> {
    let (schema, rows) = Schema::read(raw)?;
    schema.require(&["match_id", "date", "home_team", "away_team"])?;

    let mut matches = Vec::with_capacity(rows.len());
    for row in &rows {
        // Required keys: rows without them are unusable.
        let (Some(match_id), Some(date)) =
            (schema.text(row, "match_id"), schema.text(row, "date"))
        else {
            tracing::debug!("dropping match row without id or date");
            continue;
        };
        let (Some(home_team), Some(away_team)) = (
            schema.text(row, "home_team"),
            schema.text(row, "away_team"),
        ) else {
            tracing::debug!(match_id = %match_id, "dropping match row without team names");
            continue;
        };

        let home_goals = goals(&schema, row, "home_goals");
        let away_goals = goals(&schema, row, "away_goals");

        // Season column when present, otherwise the year prefix of the date.
        let season = schema
            .int(row, "season")
            .map(|v| v as i32)
            .or_else(|| date.get(..4).and_then(|y| y.parse().ok()))
            .unwrap_or(0);

        let status = match schema.text(row, "status") {
            Some(s) => MatchStatus::parse(&s),
            // Older exports carry no status column; a row with both scores
            // is a finished match.
            None if home_goals.is_some() && away_goals.is_some() => MatchStatus::Finished,
            None => MatchStatus::Scheduled,
        };

        matches.push(MatchRecord {
            match_id,
            season,
            competition: schema
                .text(row, "competition")
                .unwrap_or_else(|| "CPL".to_string()),
            date,
            matchday: schema.text(row, "matchday"),
            home_team,
            away_team,
            home_goals,
            away_goals,
            venue: schema.text(row, "venue").unwrap_or_default(),
            status,
        });
    }
    Ok(matches)
}

/// Decode the league's published standings table.
pub fn decode_standings(raw: &str) -> Result<Vec<TeamStanding>, ApiError> {
    let (schema, rows) = Schema::read(raw)?;
    schema.require(&["position", "team", "points"])?;

    let mut standings = Vec::with_capacity(rows.len());
    for row in &rows {
        let Some(team) = schema.text(row, "team") else {
            continue;
        };
        let count = |column: &str| -> u32 {
            schema
                .int(row, column)
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(0)
        };
        let goals_for = count("goals_for");
        let goals_against = count("goals_against");
        standings.push(TeamStanding {
            position: count("position"),
            team,
            played: count("played"),
            wins: count("wins"),
            draws: count("draws"),
            losses: count("losses"),
            goals_for,
            goals_against,
            // Maintained invariant, regardless of what the file says.
            goal_difference: goals_for as i32 - goals_against as i32,
            points: count("points"),
        });
    }
    Ok(standings)
}

/// Decode the club directory.
pub fn decode_teams(raw: &str) -> Result<Vec<TeamInfo>, ApiError> {
    let (schema, rows) = Schema::read(raw)?;
    schema.require(&["name"])?;

    let mut teams = Vec::with_capacity(rows.len());
    for row in &rows {
        let Some(name) = schema.text(row, "name") else {
            continue;
        };
        let active = schema
            .text(row, "active")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "yes" | "1"))
            .unwrap_or(true);
        teams.push(TeamInfo {
            name,
            city: schema.text(row, "city").unwrap_or_default(),
            province: schema.text(row, "province").unwrap_or_default(),
            stadium: schema.text(row, "stadium").unwrap_or_default(),
            founded: schema.int(row, "founded").map(|v| v as i32).unwrap_or(0),
            active,
        });
    }
    Ok(teams)
}

/// Decode one season file of closing odds.
pub fn decode_odds(raw: &str) -> Result<Vec<OddsRecord>, ApiError> {
    let (schema, rows) = Schema::read(raw)?;
    schema.require(&["match_id", "date", "bookmaker"])?;

    let mut odds = Vec::with_capacity(rows.len());
    for row in &rows {
        let (Some(match_id), Some(date)) =
            (schema.text(row, "match_id"), schema.text(row, "date"))
        else {
            tracing::debug!("dropping odds row without id or date");
            continue;
        };
        odds.push(OddsRecord {
            match_id,
            season: schema
                .int(row, "season")
                .map(|v| v as i32)
                .or_else(|| date.get(..4).and_then(|y| y.parse().ok()))
                .unwrap_or(0),
            date,
            home_team: schema.text(row, "home_team").unwrap_or_default(),
            away_team: schema.text(row, "away_team").unwrap_or_default(),
            bookmaker: schema.text(row, "bookmaker").unwrap_or_default(),
            closing_home: schema.float(row, "closing_home"),
            closing_draw: schema.float(row, "closing_draw"),
            closing_away: schema.float(row, "closing_away"),
        });
    }
    Ok(odds)
}
