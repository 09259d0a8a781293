//! Request rate limiting at the API edge
//!
//! A process-wide fixed-window counter per client identity, applied to every
//! `/api` route as axum middleware.

pub mod client_id;
pub mod limiter;
pub mod middleware;

pub use client_id::client_identity;
pub use limiter::{RateLimitStatus, RateLimiter};
pub use middleware::rate_limit_middleware;
