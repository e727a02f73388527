//! League table computation
//!
//! Folds match results into per-team rows, then ranks by points, goal
//! difference, and goals for. There is no further tie-break: the sort is
//! stable, so exact ties keep first-appearance order from the input, which
//! makes the table deterministic for a given match collection.
//!
//! A published ("official") table is preferred over recomputation when one
//! exists for the season. The two can differ: official tables exclude
//! playoff fixtures that a full recomputation folds in, which is why the
//! caller always sees the source tag.

use crate::dataset::{decode, Dataset, DatasetName};
use crate::error::ApiError;
use cpl_types::matches::MatchRecord;
use cpl_types::standings::{StandingsSource, TeamStanding};
use std::collections::HashMap;

/// A ranked table and where it came from.
#[derive(Debug, Clone)]
pub struct StandingsTable {
    pub source: StandingsSource,
    pub standings: Vec<TeamStanding>,
}

/// Fold match records into a ranked table.
pub fn compute_standings(matches: &[MatchRecord]) -> Vec<TeamStanding> {
    let mut order: Vec<String> = Vec::new();
    let mut table: HashMap<String, TeamStanding> = HashMap::new();

    let mut ensure = |order: &mut Vec<String>, table: &mut HashMap<String, TeamStanding>, team: &str| {
        if !table.contains_key(team) {
            order.push(team.to_string());
            table.insert(team.to_string(), TeamStanding::empty(team));
        }
    };

    for m in matches {
        // Both participants get a row even before any result applies.
        ensure(&mut order, &mut table, &m.home_team);
        ensure(&mut order, &mut table, &m.away_team);

        let (Some(home_goals), Some(away_goals)) = (m.home_goals, m.away_goals) else {
            continue;
        };
        if !m.has_result() {
            continue;
        }

        {
            let home = table.get_mut(&m.home_team).expect("row ensured above");
            home.played += 1;
            home.goals_for += home_goals;
            home.goals_against += away_goals;
            match home_goals.cmp(&away_goals) {
                std::cmp::Ordering::Greater => {
                    home.wins += 1;
                    home.points += 3;
                }
                std::cmp::Ordering::Equal => {
                    home.draws += 1;
                    home.points += 1;
                }
                std::cmp::Ordering::Less => home.losses += 1,
            }
        }
        {
            let away = table.get_mut(&m.away_team).expect("row ensured above");
            away.played += 1;
            away.goals_for += away_goals;
            away.goals_against += home_goals;
            match away_goals.cmp(&home_goals) {
                std::cmp::Ordering::Greater => {
                    away.wins += 1;
                    away.points += 3;
                }
                std::cmp::Ordering::Equal => {
                    away.draws += 1;
                    away.points += 1;
                }
                std::cmp::Ordering::Less => away.losses += 1,
            }
        }
    }

    let mut rows: Vec<TeamStanding> = order
        .iter()
        .filter_map(|team| table.remove(team))
        .collect();
    for row in &mut rows {
        row.goal_difference = row.goals_for as i32 - row.goals_against as i32;
    }

    // Stable sort: exact three-key ties keep input order.
    rows.sort_by(|a, b| {
        (b.points, b.goal_difference, b.goals_for).cmp(&(a.points, a.goal_difference, a.goals_for))
    });
    for (i, row) in rows.iter_mut().enumerate() {
        row.position = (i + 1) as u32;
    }
    rows
}

/// The season's table: official when published, otherwise recomputed.
pub fn season_standings(data: &dyn Dataset, season: i32) -> Result<StandingsTable, ApiError> {
    match data.read(&DatasetName::OfficialStandings(season)) {
        Ok(raw) => match decode::decode_standings(&raw) {
            Ok(standings) if !standings.is_empty() => {
                return Ok(StandingsTable {
                    source: StandingsSource::Official,
                    standings,
                });
            }
            // An empty official file is no table at all.
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(season, "official standings undecodable, recomputing: {}", e);
            }
        },
        Err(ApiError::NotFound(_)) => {}
        Err(e) => {
            // Unreadable official table degrades to recomputation.
            tracing::warn!(season, "official standings unreadable, recomputing: {}", e);
        }
    }

    let raw = data.read(&DatasetName::Season(season))?;
    let matches = decode::decode_matches(&raw)?;
    Ok(StandingsTable {
        source: StandingsSource::Calculated,
        standings: compute_standings(&matches),
    })
}
