//! Match result records
//!
//! A `MatchRecord` is one row of a season results file. Goal counts are
//! `Option` because fixtures that have not finished (and rows whose source
//! value failed numeric coercion) carry no usable score.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Finished,
    Postponed,
    Cancelled,
}

impl MatchStatus {
    /// Parse the status column, defaulting unknown values to `Scheduled`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "finished" | "ft" | "full-time" => MatchStatus::Finished,
            "live" | "in_progress" => MatchStatus::Live,
            "postponed" => MatchStatus::Postponed,
            "cancelled" | "canceled" => MatchStatus::Cancelled,
            _ => MatchStatus::Scheduled,
        }
    }
}

/// One match row from the results dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub season: i32,
    pub competition: String,
    /// ISO-8601 day, e.g. "2024-05-04".
    pub date: String,
    pub matchday: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
    pub venue: String,
    pub status: MatchStatus,
}

impl MatchRecord {
    /// Whether this match carries a final score usable for table computation.
    pub fn has_result(&self) -> bool {
        self.status == MatchStatus::Finished
            && self.home_goals.is_some()
            && self.away_goals.is_some()
    }

    /// Whether the named team played in this match (either side),
    /// compared case-insensitively.
    pub fn involves(&self, team: &str) -> bool {
        self.home_team.eq_ignore_ascii_case(team) || self.away_team.eq_ignore_ascii_case(team)
    }
}
