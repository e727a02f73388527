//! CPL Analytics API service
//!
//! Read-only JSON API over the flat-file CPL dataset (match results,
//! standings, club directory, closing odds) with request governance and a
//! derived-statistics layer.
//!
//! # Architecture
//!
//! ```text
//! Request
//!    │
//! ┌──▼─────────┐
//! │ CORS       │  ← headers on every response, answers preflight
//! ├────────────┤
//! │ Governance │  ← method gate, rate-limit admission, analytics
//! ├────────────┤
//! │ Handler    │  ← validate → read dataset → compute → JSON
//! └──┬─────────┘
//!    │
//! ┌──▼─────────┐   ┌──────────────┐
//! │ Standings  │   │ xG estimator │
//! │ engine     │   └──────────────┘
//! └──┬─────────┘
//!    │
//! ┌──▼─────────┐
//! │ Dataset    │  ← CSV record reader
//! └────────────┘
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod govern;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
pub mod stats;
pub mod stats_client;

// Service version
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
