use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::dashboard::{
    ActiveFilters, DashboardSession, DashboardView, EventDetail, FilterOptions, SortConfig,
    SortDirection, SortField,
};
use crate::models::Event;
use crate::source::{CachedEventSource, FetchStatus, SourceError};

pub struct AppState {
    pub source: Arc<CachedEventSource>,
    pub items_per_page: usize,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub view: DashboardView,
    pub fetch_status: FetchStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub message: String,
    pub count: usize,
    pub fetch_status: FetchStatus,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a fetch failure, passing through the upstream status when known
fn source_failure(err: SourceError) -> ApiError {
    tracing::error!("Error fetching events: {}", err);

    if let Some(status) = err.upstream_status().and_then(|s| StatusCode::from_u16(s).ok()) {
        return api_error(status, "Failed to fetch events");
    }
    if err.is_upstream_failure() {
        return api_error(StatusCode::BAD_GATEWAY, "Failed to fetch events");
    }
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

fn parse_param<T>(params: &HashMap<String, String>, key: &str) -> Result<Option<T>, ApiError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match params.get(key).map(String::as_str) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Invalid '{key}': {e}"))),
    }
}

/// Raw event list, cached for 30 seconds
pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<(HeaderMap, Json<Vec<Event>>), ApiError> {
    let events = state.source.events().await.map_err(source_failure)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=30, s-maxage=30"),
    );
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    if let Ok(value) = HeaderValue::from_str(&timestamp) {
        headers.insert("x-data-timestamp", value);
    }

    Ok((headers, Json(events.as_ref().clone())))
}

/// Detail card for one event
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EventDetail>, ApiError> {
    let events = state.source.events().await.map_err(source_failure)?;

    events
        .iter()
        .find(|event| event.id == id)
        .map(|event| Json(EventDetail::from_event(event)))
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Event not found"))
}

/// Filtered, sorted and paginated dashboard view.
///
/// Query parameters: `type`, `country`, `status`, `sort`, `direction`, `page`.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let filters = ActiveFilters::from_store(&params);
    let field = parse_param::<SortField>(&params, "sort")?;
    let direction = parse_param::<SortDirection>(&params, "direction")?;
    let page = parse_param::<usize>(&params, "page")?.unwrap_or(1);
    if page == 0 {
        return Err(api_error(StatusCode::BAD_REQUEST, "Invalid 'page': must be at least 1"));
    }

    let events = state.source.events().await.map_err(source_failure)?;

    let mut session = DashboardSession::new(state.items_per_page);
    session.set_sort(SortConfig::from_parts(field, direction));
    session.set_page(page);
    let view = session.view(&events, &filters);

    tracing::debug!(
        page,
        rows = view.visible_rows.len(),
        total = view.page_summary.total_items,
        "built dashboard view"
    );

    Ok(Json(DashboardResponse {
        view,
        fetch_status: state.source.status(),
    }))
}

/// Values offered by each filter dropdown
pub async fn filter_options(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FilterOptions>, ApiError> {
    let events = state.source.events().await.map_err(source_failure)?;
    Ok(Json(FilterOptions::from_events(events.iter())))
}

/// Drop the cached list and fetch it again
pub async fn refresh_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let events = state.source.refresh().await.map_err(source_failure)?;

    Ok(Json(RefreshResponse {
        message: "Events refreshed".to_string(),
        count: events.len(),
        fetch_status: state.source.status(),
    }))
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
    })
}
