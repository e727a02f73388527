//! Per-client fixed-window admission control
//!
//! Each client key holds one window record: a count and a window-end
//! timestamp. A check against an expired window replaces the record rather
//! than incrementing it. Expired records are also swept lazily, at most
//! once per sweep interval, so sweep cost stays bounded under load.
//!
//! Advisory only: the client key comes from a forwarded-address header and
//! is trusted as-is.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests admitted per key per window.
    pub limit: u32,
    /// Window length.
    pub window: Duration,
    /// Minimum time between sweeps of expired records.
    pub sweep_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: 20,
            window: Duration::hours(1),
            sweep_interval: Duration::minutes(5),
        }
    }
}

/// One client's window. Replaced, never incremented, once expired.
#[derive(Debug, Clone)]
struct WindowRecord {
    count: u32,
    window_end: DateTime<Utc>,
}

/// Outcome of an admission check, carrying everything the response headers
/// need.
#[derive(Debug, Clone)]
pub struct Admission {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// When the client's current window resets.
    pub reset: DateTime<Utc>,
}

impl Admission {
    pub fn retry_after_seconds(&self, now: DateTime<Utc>) -> i64 {
        (self.reset - now).num_seconds().max(0)
    }
}

pub struct RateLimiter {
    config: RateLimitConfig,
    records: DashMap<String, WindowRecord>,
    /// Unix seconds of the last sweep.
    last_sweep: AtomicI64,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            records: DashMap::new(),
            last_sweep: AtomicI64::new(0),
        }
    }

    /// Admission check against the wall clock.
    pub fn check(&self, key: &str) -> Admission {
        self.check_at(key, Utc::now())
    }

    /// Admission check at an explicit instant. The DashMap entry guard keeps
    /// the read-modify-write atomic per key.
    pub fn check_at(&self, key: &str, now: DateTime<Utc>) -> Admission {
        self.maybe_sweep(now);

        let mut record = self
            .records
            .entry(key.to_string())
            .or_insert_with(|| WindowRecord {
                count: 0,
                window_end: now + self.config.window,
            });

        if now >= record.window_end {
            // Expired window: replace, do not increment.
            *record = WindowRecord {
                count: 0,
                window_end: now + self.config.window,
            };
        }

        if record.count < self.config.limit {
            record.count += 1;
            Admission {
                allowed: true,
                limit: self.config.limit,
                remaining: self.config.limit - record.count,
                reset: record.window_end,
            }
        } else {
            Admission {
                allowed: false,
                limit: self.config.limit,
                remaining: 0,
                reset: record.window_end,
            }
        }
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.records.len()
    }

    /// Drop expired records, throttled to once per sweep interval.
    fn maybe_sweep(&self, now: DateTime<Utc>) {
        let last = self.last_sweep.load(Ordering::Relaxed);
        if now.timestamp() - last < self.config.sweep_interval.num_seconds() {
            return;
        }
        if self
            .last_sweep
            .compare_exchange(last, now.timestamp(), Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
        {
            // Another check already claimed this sweep.
            return;
        }

        // Other tasks keep inserting fresh keys while we sweep, so count
        // removals directly instead of diffing the map length.
        let mut removed = 0usize;
        self.records.retain(|_, record| {
            let keep = now < record.window_end;
            if !keep {
                removed += 1;
            }
            keep
        });
        if removed > 0 {
            tracing::debug!(removed, "swept expired rate-limit records");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn limiter(limit: u32) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            limit,
            window: Duration::hours(1),
            sweep_interval: Duration::minutes(5),
        })
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 4, 12, 0, 0).unwrap()
    }

    #[test]
    fn first_check_opens_a_window() {
        let limiter = limiter(20);
        let admission = limiter.check_at("1.2.3.4", t0());
        assert!(admission.allowed);
        assert_eq!(admission.remaining, 19);
        assert_eq!(admission.reset, t0() + Duration::hours(1));
    }

    #[test]
    fn twenty_first_check_in_window_is_denied() {
        let limiter = limiter(20);
        for i in 0..20 {
            let admission = limiter.check_at("1.2.3.4", t0() + Duration::seconds(i));
            assert!(admission.allowed, "check {} should be admitted", i + 1);
        }
        let denied = limiter.check_at("1.2.3.4", t0() + Duration::seconds(20));
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.reset, t0() + Duration::hours(1));
        assert!(denied.retry_after_seconds(t0() + Duration::seconds(20)) > 0);
    }

    #[test]
    fn expired_window_admits_again() {
        let limiter = limiter(20);
        for i in 0..21 {
            limiter.check_at("1.2.3.4", t0() + Duration::seconds(i));
        }
        // 22nd overall is the 1st of the new window.
        let after = limiter.check_at("1.2.3.4", t0() + Duration::hours(1));
        assert!(after.allowed);
        assert_eq!(after.remaining, 19);
        assert_eq!(after.reset, t0() + Duration::hours(2));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = limiter(1);
        assert!(limiter.check_at("a", t0()).allowed);
        assert!(!limiter.check_at("a", t0()).allowed);
        assert!(limiter.check_at("b", t0()).allowed);
    }

    #[test]
    fn remaining_counts_down() {
        let limiter = limiter(3);
        assert_eq!(limiter.check_at("k", t0()).remaining, 2);
        assert_eq!(limiter.check_at("k", t0()).remaining, 1);
        assert_eq!(limiter.check_at("k", t0()).remaining, 0);
        assert!(!limiter.check_at("k", t0()).allowed);
    }

    #[test]
    fn sweep_drops_expired_records() {
        let limiter = RateLimiter::new(RateLimitConfig {
            limit: 5,
            window: Duration::minutes(1),
            sweep_interval: Duration::minutes(5),
        });
        limiter.check_at("old", t0());
        limiter.check_at("older", t0());
        assert_eq!(limiter.tracked_keys(), 2);

        // Past both windows and the sweep throttle.
        limiter.check_at("fresh", t0() + Duration::minutes(10));
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn sweep_survives_concurrent_inserts() {
        use std::sync::Arc;

        // Zero sweep interval makes every check eligible to sweep, so
        // sweeps overlap inserts from the other threads.
        let limiter = Arc::new(RateLimiter::new(RateLimitConfig {
            limit: 5,
            window: Duration::seconds(1),
            sweep_interval: Duration::seconds(0),
        }));

        std::thread::scope(|scope| {
            for worker in 0..8 {
                let limiter = Arc::clone(&limiter);
                scope.spawn(move || {
                    for i in 0..200 {
                        let key = format!("client-{}-{}", worker, i);
                        // Advancing the clock expires earlier windows, so
                        // each sweep has records to drop while new ones
                        // land.
                        limiter.check_at(&key, t0() + Duration::seconds(i));
                    }
                });
            }
        });

        // One more check past every window sweeps the stragglers.
        limiter.check_at("flush", t0() + Duration::seconds(300));
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn sweep_is_throttled() {
        let limiter = RateLimiter::new(RateLimitConfig {
            limit: 5,
            window: Duration::minutes(1),
            sweep_interval: Duration::minutes(5),
        });
        limiter.check_at("old", t0());
        // Window expired but sweep interval has not elapsed: record stays.
        limiter.check_at("fresh", t0() + Duration::minutes(2));
        assert_eq!(limiter.tracked_keys(), 2);
    }
}
