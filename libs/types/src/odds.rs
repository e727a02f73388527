//! Closing-odds rows
//!
//! One row per (match, bookmaker) from the public closing-odds export.
//! Prices are decimal odds; a price that failed numeric coercion at load
//! time is absent rather than zero.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsRecord {
    pub match_id: String,
    pub season: i32,
    /// ISO-8601 day.
    pub date: String,
    pub home_team: String,
    pub away_team: String,
    pub bookmaker: String,
    pub closing_home: Option<f64>,
    pub closing_draw: Option<f64>,
    pub closing_away: Option<f64>,
}
