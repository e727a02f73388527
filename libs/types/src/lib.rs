//! Record definitions for the CPL analytics API
//!
//! This library provides the domain records shared across the API service:
//! match results, league standings, club metadata, closing odds, and the
//! shot-count inputs to the expected-goals model.
//!
//! # Modules
//! - `matches`: match results and status
//! - `standings`: league table rows and their provenance
//! - `teams`: club directory entries
//! - `odds`: closing-odds rows
//! - `stats`: shot counts and xG estimates

pub mod matches;
pub mod odds;
pub mod standings;
pub mod stats;
pub mod teams;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::matches::*;
    pub use crate::odds::*;
    pub use crate::standings::*;
    pub use crate::stats::*;
    pub use crate::teams::*;
}
