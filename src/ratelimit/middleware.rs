use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;

use super::client_id::client_identity;
use super::limiter::{RateLimitStatus, RateLimiter};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RateLimitedResponse {
    error: &'static str,
    message: &'static str,
    retry_after: i64,
}

/// Reject requests over the per-client budget with 429; every response
/// carries the `X-RateLimit-*` headers
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_identity(request.headers());
    let status = limiter.check(&client);

    let mut response = if status.allowed {
        next.run(request).await
    } else {
        let retry_after = status.retry_after_secs(Utc::now());
        tracing::warn!(client = %client, retry_after, "rate limit exceeded");

        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(RateLimitedResponse {
                error: "Too many requests",
                message: "Rate limit exceeded. Please try again later.",
                retry_after,
            }),
        )
            .into_response();
        response
            .headers_mut()
            .insert("retry-after", HeaderValue::from(retry_after));
        response
    };

    insert_rate_limit_headers(response.headers_mut(), &status);
    response
}

fn insert_rate_limit_headers(headers: &mut HeaderMap, status: &RateLimitStatus) {
    headers.insert("x-ratelimit-limit", HeaderValue::from(status.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(status.remaining));

    let reset = status.reset_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    if let Ok(value) = HeaderValue::from_str(&reset) {
        headers.insert("x-ratelimit-reset", value);
    }
}
