//! Club directory entries

use serde::{Deserialize, Serialize};

/// Metadata for one club in the league directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub name: String,
    pub city: String,
    pub province: String,
    pub stadium: String,
    pub founded: i32,
    /// False for defunct clubs (e.g. FC Edmonton).
    pub active: bool,
}
