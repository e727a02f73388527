//! Domain handlers
//!
//! Each handler validates its query, reads through the dataset interface,
//! computes, and returns JSON. Rate limiting, analytics, CORS, and error
//! normalization happen in the governance layer around them.

pub mod analytics;
pub mod health;
pub mod match_stats;
pub mod matches;
pub mod odds;
pub mod standings;
pub mod teams;
