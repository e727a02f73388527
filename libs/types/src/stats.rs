//! Shot counts and expected-goals estimates
//!
//! `ShotCounts` is the per-side input to the xG model, built from whatever
//! categories the upstream stats feed returned; missing categories default
//! to zero.

use serde::{Deserialize, Serialize};

/// Shot-location counts for one side of a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotCounts {
    #[serde(default)]
    pub inside_box: u32,
    #[serde(default)]
    pub outside_box: u32,
    #[serde(default)]
    pub on_target: u32,
}

/// Expected goals for both sides, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XgEstimate {
    pub home: f64,
    pub away: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_categories_deserialize_to_zero() {
        let counts: ShotCounts = serde_json::from_str(r#"{"inside_box": 4}"#).unwrap();
        assert_eq!(counts.inside_box, 4);
        assert_eq!(counts.outside_box, 0);
        assert_eq!(counts.on_target, 0);
    }
}
