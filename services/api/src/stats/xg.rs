//! Expected-goals estimation
//!
//! A fixed linear model over shot-location counts. Total function: missing
//! categories are zero and no input can fail, so a match with no shot data
//! estimates to 0.00.

use cpl_types::stats::{ShotCounts, XgEstimate};

const INSIDE_BOX_WEIGHT: f64 = 0.12;
const OUTSIDE_BOX_WEIGHT: f64 = 0.03;
const ON_TARGET_WEIGHT: f64 = 0.05;

/// xG for one side, rounded to two decimals.
pub fn estimate_side(shots: &ShotCounts) -> f64 {
    let raw = f64::from(shots.inside_box) * INSIDE_BOX_WEIGHT
        + f64::from(shots.outside_box) * OUTSIDE_BOX_WEIGHT
        + f64::from(shots.on_target) * ON_TARGET_WEIGHT;
    (raw * 100.0).round() / 100.0
}

/// xG for both sides independently.
pub fn estimate(home: &ShotCounts, away: &ShotCounts) -> XgEstimate {
    XgEstimate {
        home: estimate_side(home),
        away: estimate_side(away),
    }
}
