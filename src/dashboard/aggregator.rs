//! Lifecycle counts and inventory totals over an event list

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

use crate::models::Event;

const STATUS_UPCOMING: &str = "upcoming";
const STATUS_LIVE: &str = "live";
const STATUS_PAST: &str = "past";

/// Lifecycle breakdown shown in the stats grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub total_events: usize,
    pub upcoming_events: usize,
    pub live_events: usize,
    pub past_events: usize,
}

/// Inventory totals shown in the table footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTotals {
    pub total_events: usize,
    pub total_capacity: u64,
    pub total_booked: u64,
    pub unique_countries: usize,
    pub unique_cities: usize,
    pub unique_types: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Upcoming,
    Live,
    Past,
}

/// Bucket an event. Status "upcoming" or a future date wins over everything
/// else; an event matching no rule lands in no bucket.
fn classify(event: &Event, now: DateTime<Utc>) -> Option<Lifecycle> {
    let date = event.timestamp();

    if event.status == STATUS_UPCOMING || date.is_some_and(|d| d > now) {
        Some(Lifecycle::Upcoming)
    } else if event.status == STATUS_LIVE {
        Some(Lifecycle::Live)
    } else if event.status == STATUS_PAST || date.is_some_and(|d| d < now) {
        Some(Lifecycle::Past)
    } else {
        None
    }
}

/// Lifecycle counts relative to the current instant
pub fn compute_stats<'a, I>(events: I) -> EventStats
where
    I: IntoIterator<Item = &'a Event>,
{
    compute_stats_at(events, Utc::now())
}

/// Lifecycle counts relative to `now`
pub fn compute_stats_at<'a, I>(events: I, now: DateTime<Utc>) -> EventStats
where
    I: IntoIterator<Item = &'a Event>,
{
    events
        .into_iter()
        .fold(EventStats::default(), |mut stats, event| {
            stats.total_events += 1;
            match classify(event, now) {
                Some(Lifecycle::Upcoming) => stats.upcoming_events += 1,
                Some(Lifecycle::Live) => stats.live_events += 1,
                Some(Lifecycle::Past) => stats.past_events += 1,
                None => {}
            }
            stats
        })
}

/// Footer totals, `None` when there is nothing to total
pub fn compute_totals<'a, I>(events: I) -> Option<EventTotals>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut total_events = 0;
    let mut total_capacity = 0u64;
    let mut total_booked = 0u64;
    let mut countries = HashSet::new();
    let mut cities = HashSet::new();
    let mut types = HashSet::new();

    for event in events {
        total_events += 1;
        total_capacity += event.capacity;
        total_booked += event.booked;
        // Grouped by display name, ids are ignored
        countries.insert(event.country_name());
        cities.insert(event.city_name());
        types.insert(event.event_type.as_str());
    }

    if total_events == 0 {
        return None;
    }

    Some(EventTotals {
        total_events,
        total_capacity,
        total_booked,
        unique_countries: countries.len(),
        unique_cities: cities.len(),
        unique_types: types.len(),
    })
}
