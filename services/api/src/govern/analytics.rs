//! In-process usage analytics
//!
//! Two kinds of state: counters that live for the whole process (calendar
//! totals, per-endpoint stats, unique clients, countries) and bounded
//! rolling state (24 hourly buckets, the last 100 requests). Everything is
//! reset on restart; there is no persistence.
//!
//! Calendar counters store the period key they were accumulated under
//! (day, ISO week, month) and roll over to zero the first time a track call
//! arrives in a new period. One mutex guards the whole interior so a
//! rollover-plus-increment is a single atomic transition.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Instant;

/// Most recent requests kept, FIFO eviction.
const RECENT_CAP: usize = 100;
/// Hour buckets older than this are pruned.
const HOUR_HORIZON_SECS: i64 = 24 * 3600;
/// Recent entries shown to privileged / unprivileged callers.
const RECENT_SHOWN_PRIVILEGED: usize = 20;
const RECENT_SHOWN: usize = 5;
/// Countries listed in the summary.
const TOP_COUNTRIES: usize = 10;

/// A counter valid only while the stored period key matches the clock.
#[derive(Debug, Default)]
struct PeriodCounter {
    key: String,
    count: u64,
}

impl PeriodCounter {
    fn bump(&mut self, key: &str) {
        if self.key != key {
            self.key = key.to_string();
            self.count = 0;
        }
        self.count += 1;
    }

    /// Current value, zero when the stored period has lapsed.
    fn current(&self, key: &str) -> u64 {
        if self.key == key {
            self.count
        } else {
            0
        }
    }
}

#[derive(Debug, Default)]
struct EndpointStats {
    calls: u64,
    errors: u64,
    total_latency_ms: u64,
}

#[derive(Debug, Default)]
struct HourBucket {
    calls: u64,
    clients: HashSet<String>,
}

/// One redacted entry in the recent-requests ring.
#[derive(Debug, Clone, Serialize)]
pub struct RecentRequest {
    pub endpoint: String,
    /// Client key, partially redacted.
    pub client: String,
    pub status: u16,
    pub response_time_ms: u64,
    pub country: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    day: PeriodCounter,
    week: PeriodCounter,
    month: PeriodCounter,
    all_time: u64,
    endpoints: HashMap<String, EndpointStats>,
    clients: HashSet<String>,
    countries: HashMap<String, u64>,
    /// Keyed by hour-aligned unix seconds.
    hours: BTreeMap<i64, HourBucket>,
    recent: VecDeque<RecentRequest>,
}

pub struct UsageAnalytics {
    started: Instant,
    inner: Mutex<Inner>,
}

impl UsageAnalytics {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Record one completed request against the wall clock.
    pub fn track(
        &self,
        endpoint: &str,
        client_key: &str,
        response_time_ms: u64,
        status: u16,
        country: &str,
    ) {
        self.track_at(endpoint, client_key, response_time_ms, status, country, Utc::now());
    }

    /// Record one completed request at an explicit instant.
    pub fn track_at(
        &self,
        endpoint: &str,
        client_key: &str,
        response_time_ms: u64,
        status: u16,
        country: &str,
        now: DateTime<Utc>,
    ) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };

        // Calendar rollover happens before the increment.
        inner.day.bump(&day_key(now));
        inner.week.bump(&week_key(now));
        inner.month.bump(&month_key(now));
        inner.all_time += 1;

        let stats = inner.endpoints.entry(endpoint.to_string()).or_default();
        stats.calls += 1;
        if status >= 400 {
            stats.errors += 1;
        }
        stats.total_latency_ms += response_time_ms;

        inner.clients.insert(client_key.to_string());
        *inner.countries.entry(country.to_string()).or_insert(0) += 1;

        let hour = hour_floor(now);
        let bucket = inner.hours.entry(hour).or_default();
        bucket.calls += 1;
        bucket.clients.insert(client_key.to_string());

        // Drop buckets that fell off the 24-hour horizon.
        let cutoff = now.timestamp() - HOUR_HORIZON_SECS;
        inner.hours.retain(|ts, _| *ts > cutoff);

        inner.recent.push_front(RecentRequest {
            endpoint: endpoint.to_string(),
            client: mask_key(client_key),
            status,
            response_time_ms,
            country: country.to_string(),
            timestamp: now,
        });
        inner.recent.truncate(RECENT_CAP);
    }

    /// Seconds since the process-wide store was created.
    pub fn uptime_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    /// Read view against the wall clock.
    pub fn summarize(&self, privileged: bool) -> AnalyticsSummary {
        self.summarize_at(privileged, Utc::now())
    }

    /// Read view at an explicit instant. Never mutates state: a lapsed
    /// calendar counter simply reads as zero.
    pub fn summarize_at(&self, privileged: bool, now: DateTime<Utc>) -> AnalyticsSummary {
        let inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut endpoints: Vec<EndpointSummary> = inner
            .endpoints
            .iter()
            .map(|(endpoint, stats)| EndpointSummary {
                endpoint: endpoint.clone(),
                calls: stats.calls,
                errors: stats.errors,
                avg_response_time_ms: if stats.calls == 0 {
                    0.0
                } else {
                    round2(stats.total_latency_ms as f64 / stats.calls as f64)
                },
                error_rate: if stats.calls == 0 {
                    0.0
                } else {
                    round2(stats.errors as f64 / stats.calls as f64)
                },
            })
            .collect();
        endpoints.sort_by(|a, b| a.endpoint.cmp(&b.endpoint));

        let cutoff = now.timestamp() - HOUR_HORIZON_SECS;
        let hourly: Vec<HourlySummary> = inner
            .hours
            .iter()
            .filter(|(ts, _)| **ts > cutoff)
            .map(|(ts, bucket)| HourlySummary {
                hour: *ts,
                calls: bucket.calls,
                unique_clients: bucket.clients.len() as u64,
            })
            .collect();

        let mut countries: Vec<CountrySummary> = inner
            .countries
            .iter()
            .map(|(country, requests)| CountrySummary {
                country: country.clone(),
                requests: *requests,
            })
            .collect();
        countries.sort_by(|a, b| b.requests.cmp(&a.requests).then(a.country.cmp(&b.country)));
        countries.truncate(TOP_COUNTRIES);

        let shown = if privileged {
            RECENT_SHOWN_PRIVILEGED
        } else {
            RECENT_SHOWN
        };
        let recent = inner.recent.iter().take(shown).cloned().collect();

        AnalyticsSummary {
            requests_today: inner.day.current(&day_key(now)),
            requests_this_week: inner.week.current(&week_key(now)),
            requests_this_month: inner.month.current(&month_key(now)),
            requests_all_time: inner.all_time,
            unique_clients: inner.clients.len() as u64,
            uptime_seconds: self.started.elapsed().as_secs(),
            endpoints,
            hourly,
            top_countries: countries,
            recent,
        }
    }
}

impl Default for UsageAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointSummary {
    pub endpoint: String,
    pub calls: u64,
    pub errors: u64,
    pub avg_response_time_ms: f64,
    /// errors / calls, zero when no calls.
    pub error_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourlySummary {
    /// Hour-aligned unix seconds.
    pub hour: i64,
    pub calls: u64,
    pub unique_clients: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountrySummary {
    pub country: String,
    pub requests: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub requests_today: u64,
    pub requests_this_week: u64,
    pub requests_this_month: u64,
    pub requests_all_time: u64,
    pub unique_clients: u64,
    pub uptime_seconds: u64,
    pub endpoints: Vec<EndpointSummary>,
    /// Last 24 hours, chronological.
    pub hourly: Vec<HourlySummary>,
    pub top_countries: Vec<CountrySummary>,
    pub recent: Vec<RecentRequest>,
}

fn day_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// ISO week key; ISO weeks start on Monday.
fn week_key(now: DateTime<Utc>) -> String {
    let week = now.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

fn month_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m").to_string()
}

fn hour_floor(now: DateTime<Utc>) -> i64 {
    let ts = now.timestamp();
    ts - ts.rem_euclid(3600)
}

/// Redact a client key: keep at most half of it, capped at six characters,
/// so even a short key never appears whole.
fn mask_key(key: &str) -> String {
    let keep = (key.chars().count() / 2).min(6);
    let kept: String = key.chars().take(keep).collect();
    format!("{}...", kept)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        // A Saturday.
        Utc.with_ymd_and_hms(2024, 5, 4, 12, 0, 0).unwrap()
    }

    fn track(analytics: &UsageAnalytics, status: u16, now: DateTime<Utc>) {
        analytics.track_at("/matches", "203.0.113.7", 12, status, "CA", now);
    }

    #[test]
    fn totals_accumulate() {
        let analytics = UsageAnalytics::new();
        track(&analytics, 200, t0());
        track(&analytics, 404, t0());

        let summary = analytics.summarize_at(true, t0());
        assert_eq!(summary.requests_today, 2);
        assert_eq!(summary.requests_all_time, 2);
        assert_eq!(summary.unique_clients, 1);
        assert_eq!(summary.endpoints.len(), 1);
        assert_eq!(summary.endpoints[0].calls, 2);
        assert_eq!(summary.endpoints[0].errors, 1);
        assert_eq!(summary.endpoints[0].error_rate, 0.5);
        assert_eq!(summary.endpoints[0].avg_response_time_ms, 12.0);
    }

    #[test]
    fn day_counter_rolls_over_at_midnight() {
        let analytics = UsageAnalytics::new();
        track(&analytics, 200, t0());
        track(&analytics, 200, t0());

        let next_day = Utc.with_ymd_and_hms(2024, 5, 5, 0, 1, 0).unwrap();
        track(&analytics, 200, next_day);

        let summary = analytics.summarize_at(true, next_day);
        assert_eq!(summary.requests_today, 1);
        assert_eq!(summary.requests_all_time, 3);
    }

    #[test]
    fn week_boundary_is_monday() {
        let analytics = UsageAnalytics::new();
        // Sunday 2024-05-05 and Monday 2024-05-06 are different ISO weeks.
        let sunday = Utc.with_ymd_and_hms(2024, 5, 5, 23, 0, 0).unwrap();
        let monday = Utc.with_ymd_and_hms(2024, 5, 6, 1, 0, 0).unwrap();
        track(&analytics, 200, sunday);
        track(&analytics, 200, monday);

        let summary = analytics.summarize_at(true, monday);
        assert_eq!(summary.requests_this_week, 1);
    }

    #[test]
    fn lapsed_period_reads_zero_without_traffic() {
        let analytics = UsageAnalytics::new();
        track(&analytics, 200, t0());

        let much_later = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let summary = analytics.summarize_at(true, much_later);
        assert_eq!(summary.requests_today, 0);
        assert_eq!(summary.requests_this_week, 0);
        assert_eq!(summary.requests_this_month, 0);
        assert_eq!(summary.requests_all_time, 1);
    }

    #[test]
    fn hour_buckets_prune_past_24h() {
        let analytics = UsageAnalytics::new();
        track(&analytics, 200, t0());
        let later = t0() + chrono::Duration::hours(25);
        track(&analytics, 200, later);

        let summary = analytics.summarize_at(true, later);
        assert_eq!(summary.hourly.len(), 1);
        assert_eq!(summary.hourly[0].hour, hour_floor(later));
    }

    #[test]
    fn hourly_buckets_count_unique_clients() {
        let analytics = UsageAnalytics::new();
        analytics.track_at("/matches", "a", 1, 200, "CA", t0());
        analytics.track_at("/matches", "b", 1, 200, "CA", t0());
        analytics.track_at("/matches", "a", 1, 200, "CA", t0());

        let summary = analytics.summarize_at(true, t0());
        assert_eq!(summary.hourly.len(), 1);
        assert_eq!(summary.hourly[0].calls, 3);
        assert_eq!(summary.hourly[0].unique_clients, 2);
    }

    #[test]
    fn recent_list_caps_at_100_fifo() {
        let analytics = UsageAnalytics::new();
        for i in 0..150 {
            analytics.track_at(
                &format!("/e{}", i),
                "203.0.113.7",
                1,
                200,
                "CA",
                t0() + chrono::Duration::seconds(i),
            );
        }

        let inner = analytics.inner.lock().unwrap();
        assert_eq!(inner.recent.len(), 100);
        // Newest first; the oldest 50 were evicted.
        assert_eq!(inner.recent.front().unwrap().endpoint, "/e149");
        assert_eq!(inner.recent.back().unwrap().endpoint, "/e50");
    }

    #[test]
    fn recent_entries_are_masked() {
        let analytics = UsageAnalytics::new();
        track(&analytics, 200, t0());
        let summary = analytics.summarize_at(true, t0());
        assert_eq!(summary.recent[0].client, "203.0...");
        assert!(!summary.recent[0].client.contains("113.7"));
    }

    #[test]
    fn short_keys_never_mask_to_themselves() {
        for key in ["ab", "x", "1.2.3.4", "unknown"] {
            let masked = mask_key(key);
            assert!(!masked.starts_with(key), "{:?} leaked as {:?}", key, masked);
            assert!(masked.ends_with("..."));
        }
        assert_eq!(mask_key("ab"), "a...");
        assert_eq!(mask_key("x"), "...");
    }

    #[test]
    fn privilege_gates_recent_depth() {
        let analytics = UsageAnalytics::new();
        for i in 0..30 {
            track(&analytics, 200, t0() + chrono::Duration::seconds(i));
        }
        assert_eq!(analytics.summarize_at(true, t0()).recent.len(), 20);
        assert_eq!(analytics.summarize_at(false, t0()).recent.len(), 5);
    }

    #[test]
    fn top_countries_sorted_and_capped() {
        let analytics = UsageAnalytics::new();
        for i in 0..12 {
            let country = format!("C{:02}", i);
            for _ in 0..=i {
                analytics.track_at("/matches", "k", 1, 200, &country, t0());
            }
        }
        let summary = analytics.summarize_at(true, t0());
        assert_eq!(summary.top_countries.len(), 10);
        assert_eq!(summary.top_countries[0].country, "C11");
        assert!(summary.top_countries[0].requests > summary.top_countries[9].requests);
    }
}
