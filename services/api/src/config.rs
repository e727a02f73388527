//! Service configuration
//!
//! All settings come from the environment with working defaults, so the
//! service runs with no configuration at all against `./data`.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the API service.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Root of the flat-file dataset.
    pub data_dir: PathBuf,
    /// Base URL of the upstream match-stats service; stats degrade to
    /// "unavailable" when unset.
    pub stats_api_url: Option<String>,
    /// Timeout for outbound stats fetches.
    pub stats_timeout: Duration,
    /// Key unlocking the detailed /analytics view; unset means the detailed
    /// view is never served.
    pub admin_key: Option<String>,
    /// Requests admitted per client per window.
    pub rate_limit: u32,
    /// Admission window length in seconds.
    pub rate_window_secs: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_parsed("HOST", IpAddr::from([0, 0, 0, 0])),
            port: env_parsed("PORT", 8080),
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            stats_api_url: std::env::var("STATS_API_URL")
                .ok()
                .filter(|v| !v.is_empty()),
            stats_timeout: Duration::from_secs(env_parsed("STATS_TIMEOUT_SECS", 5)),
            admin_key: std::env::var("ADMIN_KEY").ok().filter(|v| !v.is_empty()),
            rate_limit: env_parsed("RATE_LIMIT", 20),
            rate_window_secs: env_parsed("RATE_WINDOW_SECS", 3600),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            data_dir: PathBuf::from("data"),
            stats_api_url: None,
            stats_timeout: Duration::from_secs(5),
            admin_key: None,
            rate_limit: 20,
            rate_window_secs: 3600,
        }
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!("Ignoring unparseable {} value: {:?}", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.rate_limit, 20);
        assert_eq!(config.rate_window_secs, 3600);
        assert_eq!(config.port, 8080);
        assert!(config.admin_key.is_none());
    }
}
