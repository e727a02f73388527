//! Request governance
//!
//! Everything that wraps the domain handlers: fixed-window rate limiting,
//! usage analytics, and the middleware composing them with CORS, method
//! filtering, and response-header policy.

pub mod analytics;
pub mod pipeline;
pub mod rate_limit;
