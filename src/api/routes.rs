use axum::{
    http::Method,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::ratelimit::{rate_limit_middleware, RateLimiter};
use crate::source::CachedEventSource;

use super::handlers::{
    dashboard, filter_options, get_event, health_check, list_events, refresh_events, AppState,
};

pub fn create_api_router(source: Arc<CachedEventSource>, config: &Config) -> Router {
    let state = Arc::new(AppState {
        source,
        items_per_page: config.dashboard.items_per_page,
    });

    let mut api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/events", get(list_events))
        .route("/events/{id}", get(get_event))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/filters", get(filter_options))
        .route("/refresh", post(refresh_events))
        .with_state(state);

    if config.rate_limit.enabled {
        let limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));
        api_routes = api_routes.route_layer(middleware::from_fn_with_state(
            limiter,
            rate_limit_middleware,
        ));
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new().nest("/api", api_routes).layer(cors)
}
