//! Rate limiting integration tests
//!
//! Verify the middleware budget, the 429 payload and the `X-RateLimit-*`
//! headers through the real router.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use eventdash::api::create_api_router;
use eventdash::config::Config;
use eventdash::source::{CachedEventSource, EventSource, StaticEventSource};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn create_limited_app(max_requests: u32) -> Router {
    let mut config = Config::from_vars(|_| None).unwrap();
    config.rate_limit.enabled = true;
    config.rate_limit.max_requests = max_requests;
    config.rate_limit.window_secs = 60;

    let upstream: Arc<dyn EventSource> = Arc::new(StaticEventSource::new(Vec::new()));
    let source = Arc::new(CachedEventSource::new(
        upstream,
        Duration::from_secs(30),
        Duration::from_secs(15),
    ));
    create_api_router(source, &config)
}

fn request_from(ip: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/api/health");
    if let Some(ip) = ip {
        builder = builder.header("x-forwarded-for", ip);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_rate_limit_headers_on_success() {
    let app = create_limited_app(5);

    let response = app.oneshot(request_from(Some("203.0.113.9"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers.get("x-ratelimit-limit").unwrap(), "5");
    assert_eq!(headers.get("x-ratelimit-remaining").unwrap(), "4");

    let reset = headers.get("x-ratelimit-reset").unwrap().to_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(reset).is_ok());
    assert!(reset.ends_with('Z'));
}

#[tokio::test]
async fn test_requests_over_limit_get_429() {
    let app = create_limited_app(3);

    for expected_remaining in ["2", "1", "0"] {
        let response = app
            .clone()
            .oneshot(request_from(Some("198.51.100.4")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-ratelimit-remaining").unwrap(),
            expected_remaining
        );
    }

    let response = app
        .clone()
        .oneshot(request_from(Some("198.51.100.4")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers().get("x-ratelimit-remaining").unwrap(), "0");

    let retry_after: i64 = response
        .headers()
        .get("retry-after")
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Too many requests");
    assert_eq!(json["retryAfter"], retry_after);
}

#[tokio::test]
async fn test_clients_have_separate_budgets() {
    let app = create_limited_app(1);

    let first = app.clone().oneshot(request_from(Some("10.0.0.1"))).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let blocked = app.clone().oneshot(request_from(Some("10.0.0.1"))).await.unwrap();
    assert_eq!(blocked.status(), StatusCode::TOO_MANY_REQUESTS);

    // Only the first X-Forwarded-For entry identifies the client
    let other = app
        .clone()
        .oneshot(request_from(Some("10.0.0.2, 10.0.0.1")))
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_anonymous_clients_share_a_bucket() {
    let app = create_limited_app(2);

    for _ in 0..2 {
        let response = app.clone().oneshot(request_from(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = app.clone().oneshot(request_from(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_disabled_limiter_adds_no_headers() {
    let mut config = Config::from_vars(|_| None).unwrap();
    config.rate_limit.enabled = false;
    let upstream: Arc<dyn EventSource> = Arc::new(StaticEventSource::new(Vec::new()));
    let source = Arc::new(CachedEventSource::new(
        upstream,
        Duration::from_secs(30),
        Duration::from_secs(15),
    ));
    let app = create_api_router(source, &config);

    let response = app.oneshot(request_from(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!response.headers().contains_key("x-ratelimit-limit"));
}
