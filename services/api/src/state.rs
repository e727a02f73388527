//! Shared application state
//!
//! The rate-limit and analytics stores are process-wide and live for the
//! process lifetime; nothing here survives a restart.

use crate::config::Config;
use crate::dataset::{Dataset, FsDataset};
use crate::govern::analytics::UsageAnalytics;
use crate::govern::rate_limit::{RateLimitConfig, RateLimiter};
use crate::stats_client::StatsClient;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub data: Arc<dyn Dataset>,
    pub rate_limiter: Arc<RateLimiter>,
    pub analytics: Arc<UsageAnalytics>,
    pub stats_client: Arc<StatsClient>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let data = Arc::new(FsDataset::new(config.data_dir.clone()));
        Self::with_dataset(config, data)
    }

    /// Construct with an explicit dataset backend (used by tests).
    pub fn with_dataset(config: Config, data: Arc<dyn Dataset>) -> Self {
        let rate_limiter = RateLimiter::new(RateLimitConfig {
            limit: config.rate_limit,
            window: chrono::Duration::seconds(config.rate_window_secs),
            ..RateLimitConfig::default()
        });
        let stats_client = StatsClient::new(config.stats_api_url.clone(), config.stats_timeout);
        Self {
            config: Arc::new(config),
            data,
            rate_limiter: Arc::new(rate_limiter),
            analytics: Arc::new(UsageAnalytics::new()),
            stats_client: Arc::new(stats_client),
        }
    }
}
