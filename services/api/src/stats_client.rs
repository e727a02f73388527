//! Outbound match-stats client
//!
//! Fetches per-match shot statistics from the upstream stats service with a
//! bounded timeout. Any transport, status, or parse failure degrades to
//! `None`; the primary response never blocks on this call beyond the
//! timeout and never fails because of it.

use cpl_types::stats::ShotCounts;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Shot statistics for both sides of one match, as returned upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchShotStats {
    pub home: ShotCounts,
    pub away: ShotCounts,
}

pub struct StatsClient {
    http: Client,
    base_url: Option<String>,
}

impl StatsClient {
    pub fn new(base_url: Option<String>, timeout: Duration) -> Self {
        let http = match Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("stats client builder failed, using defaults: {}", e);
                Client::new()
            }
        };
        Self { http, base_url }
    }

    /// Shot stats for a match, `None` on any failure or when no upstream is
    /// configured.
    pub async fn fetch(&self, match_id: &str, season: i32) -> Option<MatchShotStats> {
        let base = self.base_url.as_deref()?;
        let url = format!(
            "{}/seasons/{}/matches/{}/stats",
            base.trim_end_matches('/'),
            season,
            match_id
        );

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(match_id, "stats fetch failed: {}", e);
                return None;
            }
        };
        if !response.status().is_success() {
            tracing::debug!(match_id, status = %response.status(), "stats upstream returned non-success");
            return None;
        }
        match response.json::<MatchShotStats>().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::warn!(match_id, "stats response unparseable: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_upstream_yields_none() {
        let client = StatsClient::new(None, Duration::from_secs(1));
        assert!(client.fetch("m1", 2024).await.is_none());
    }
}
