//! The governance middleware wrapped around every route
//!
//! Ordered steps, each able to short-circuit the rest:
//!
//! 1. CORS headers are attached by the [`CorsLayer`] sitting outside this
//!    middleware; it also answers `OPTIONS` preflight directly.
//! 2. Anything other than `GET`/`HEAD` gets a normalized 405.
//! 3. The analytics timer starts.
//! 4. On rate-limited routes the client key is resolved and the admission
//!    check runs; denial is recorded with status 429 and answered with a
//!    retry-after body. `X-RateLimit-*` headers go on every governed
//!    response, allowed or not.
//! 5. The handler runs; its `Result` is normalized by `ApiError`.
//! 6. A cache-control header matching the route's volatility is attached
//!    to successful responses, and the outcome is recorded in analytics.
//!
//! [`CorsLayer`]: tower_http::cors::CorsLayer

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::time::Instant;

use super::rate_limit::Admission;

/// Per-route governance policy.
struct RoutePolicy {
    rate_limited: bool,
    /// Cache-control for successful responses; None leaves the header off.
    cache_control: Option<&'static str>,
    /// Analytics key for this path. Requests outside the route table all
    /// share one label, so probing cannot grow the endpoint map.
    label: &'static str,
}

fn policy_for(path: &str) -> RoutePolicy {
    match path {
        // Historical data changes rarely.
        "/matches" | "/teams" | "/odds" => RoutePolicy {
            rate_limited: true,
            cache_control: Some("public, max-age=3600"),
            label: route_label(path),
        },
        // Standings and live stats move during a matchday.
        "/standings" | "/match-stats" => RoutePolicy {
            rate_limited: true,
            cache_control: Some("public, max-age=600"),
            label: route_label(path),
        },
        "/analytics" => RoutePolicy {
            rate_limited: true,
            cache_control: Some("no-store"),
            label: "/analytics",
        },
        // Health probes must never be throttled.
        "/health" => RoutePolicy {
            rate_limited: false,
            cache_control: Some("no-store"),
            label: "/health",
        },
        _ => RoutePolicy {
            rate_limited: true,
            cache_control: None,
            label: "unmatched",
        },
    }
}

/// Maps a known path back to its static route string.
fn route_label(path: &str) -> &'static str {
    match path {
        "/matches" => "/matches",
        "/teams" => "/teams",
        "/odds" => "/odds",
        "/standings" => "/standings",
        "/match-stats" => "/match-stats",
        _ => "unmatched",
    }
}

/// Client identity: first hop of `x-forwarded-for`, trusted as-is.
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// Country bucket: only a well-formed ISO 3166 alpha-2 code is accepted,
/// which caps the analytics country map at 26*26 entries plus "unknown".
fn country_of(headers: &HeaderMap) -> String {
    headers
        .get("x-country-code")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| value.len() == 2 && value.chars().all(|c| c.is_ascii_alphabetic()))
        .map(str::to_ascii_uppercase)
        .unwrap_or_else(|| "unknown".to_string())
}

fn apply_rate_limit_headers(response: &mut Response, admission: &Admission) {
    let headers = response.headers_mut();
    headers.insert(
        "x-ratelimit-limit",
        header_value(admission.limit.to_string()),
    );
    headers.insert(
        "x-ratelimit-remaining",
        header_value(admission.remaining.to_string()),
    );
    headers.insert(
        "x-ratelimit-reset",
        header_value(admission.reset.timestamp().to_string()),
    );
}

fn header_value(value: String) -> HeaderValue {
    // Numeric strings are always valid header values.
    HeaderValue::from_str(&value).unwrap_or(HeaderValue::from_static("0"))
}

/// The governance middleware itself.
pub async fn govern(State(state): State<AppState>, request: Request, next: Next) -> Response {
    // Preflight is answered by the CORS layer before we run; anything else
    // that is not a read is refused up front.
    let method = request.method();
    if method != Method::GET && method != Method::HEAD {
        return ApiError::MethodNotAllowed.into_response();
    }

    let path = request.uri().path().to_string();
    let policy = policy_for(&path);
    let key = client_key(request.headers());
    let country = country_of(request.headers());
    let started = Instant::now();
    let now = Utc::now();

    let admission = if policy.rate_limited {
        Some(state.rate_limiter.check_at(&key, now))
    } else {
        None
    };

    if let Some(admission) = &admission {
        if !admission.allowed {
            tracing::warn!(client = %key, path = %path, "rate limit exceeded");
            state.analytics.track_at(
                policy.label,
                &key,
                started.elapsed().as_millis() as u64,
                429,
                &country,
                now,
            );
            let mut response = ApiError::RateLimited {
                retry_after_seconds: admission.retry_after_seconds(now),
            }
            .into_response();
            apply_rate_limit_headers(&mut response, admission);
            return response;
        }
    }

    let mut response = next.run(request).await;

    if let Some(admission) = &admission {
        apply_rate_limit_headers(&mut response, admission);
    }
    if let Some(cache) = policy.cache_control {
        if response.status().is_success() {
            response
                .headers_mut()
                .insert(header::CACHE_CONTROL, HeaderValue::from_static(cache));
        }
    }

    state.analytics.track(
        policy.label,
        &key,
        started.elapsed().as_millis() as u64,
        response.status().as_u16(),
        &country,
    );

    response
}
