//! End-to-end view model: filter -> sort -> paginate -> aggregate

use serde::Serialize;

use super::aggregator::{compute_stats, compute_totals, EventStats, EventTotals};
use super::filter::{ActiveFilters, FilterOptions};
use super::page_numbers::{page_numbers, PageMarker};
use super::paginator::Paginator;
use super::sort::{sort_events, SortConfig, SortField, SortIndicator};
use crate::models::Event;

/// One table row. `type` appears twice because the table shows it in both
/// the "Event" and "Type" columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRow {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub country: String,
    pub city: String,
    pub date: String,
    pub capacity: u64,
    pub status: String,
    pub type_again: String,
    pub booked: u64,
}

impl EventRow {
    pub fn from_event(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            event_type: event.event_type.clone(),
            country: event.country_name().to_string(),
            city: event.city_name().to_string(),
            date: event.display_date(),
            capacity: event.capacity,
            status: event.status.clone(),
            type_again: event.event_type.clone(),
            booked: event.booked,
        }
    }

    /// Cell texts in column order
    pub fn cells(&self) -> [String; 8] {
        [
            self.event_type.clone(),
            self.country.clone(),
            self.city.clone(),
            self.date.clone(),
            self.capacity.to_string(),
            self.status.clone(),
            self.type_again.clone(),
            self.booked.to_string(),
        ]
    }
}

/// Detail card for a single event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDetail {
    pub id: String,
    pub title: String,
    pub status: String,
    pub date: String,
    pub capacity: u64,
    pub booked: u64,
    pub country: String,
    pub city: String,
    pub zone: String,
}

impl EventDetail {
    pub fn from_event(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            title: format!("{} - {}", event.event_type, event.id),
            status: event.status.clone(),
            date: event.display_date(),
            capacity: event.capacity,
            booked: event.booked,
            country: event.country_name().to_string(),
            city: event.city_name().to_string(),
            zone: event.zone.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeader {
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<SortField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicator: Option<SortIndicator>,
}

const COLUMNS: [(&str, Option<SortField>); 8] = [
    ("Event", Some(SortField::Type)),
    ("Country", Some(SortField::Country)),
    ("City", Some(SortField::City)),
    ("Date", Some(SortField::Date)),
    ("Capacity", Some(SortField::Capacity)),
    ("Status", Some(SortField::Status)),
    ("Type", None),
    ("Booked", Some(SortField::Booked)),
];

/// Table headers with the indicator each sortable column should show
pub fn column_headers(config: SortConfig) -> Vec<ColumnHeader> {
    COLUMNS
        .iter()
        .map(|&(label, field)| ColumnHeader {
            label,
            field,
            indicator: field.map(|f| config.indicator(f)),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FooterCell {
    pub label: &'static str,
    pub text: String,
}

/// Footer cells aligned with the table columns
pub fn footer_cells(totals: &EventTotals) -> Vec<FooterCell> {
    let cell = |label: &'static str, value: String| FooterCell {
        label,
        text: format!("{value} {label}"),
    };
    let placeholder = || FooterCell {
        label: "-",
        text: "-".to_string(),
    };

    vec![
        cell("Events", totals.total_events.to_string()),
        cell("Countries", totals.unique_countries.to_string()),
        cell("Cities", totals.unique_cities.to_string()),
        placeholder(),
        cell("Capacity", totals.total_capacity.to_string()),
        placeholder(),
        cell("Types", totals.unique_types.to_string()),
        cell("Booked", totals.total_booked.to_string()),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub current_page: usize,
    pub total_pages: usize,
    pub items_per_page: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub total_items: usize,
    pub pages: Vec<PageMarker>,
    pub has_previous: bool,
    pub has_next: bool,
    /// Controls are hidden for a single page
    pub show_controls: bool,
}

impl PageSummary {
    /// "Showing X to Y of Z events", or `None` when there is nothing to show
    pub fn caption(&self) -> Option<String> {
        if self.total_items == 0 {
            return None;
        }
        Some(format!(
            "Showing {} to {} of {} events",
            self.start_index.saturating_add(1),
            self.end_index,
            self.total_items
        ))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Lifecycle counts over the filtered events
    pub stats: EventStats,
    pub filter_options: FilterOptions,
    pub active_filters: ActiveFilters,
    pub columns: Vec<ColumnHeader>,
    pub visible_rows: Vec<EventRow>,
    /// Totals over the full, unfiltered list
    pub footer_totals: Option<EventTotals>,
    pub footer: Vec<FooterCell>,
    pub page_summary: PageSummary,
}

/// Per-view state: the active sort and the page counter
#[derive(Debug, Clone, Default)]
pub struct DashboardSession {
    sort: SortConfig,
    paginator: Paginator,
}

impl DashboardSession {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            sort: SortConfig::Unsorted,
            paginator: Paginator::new(items_per_page),
        }
    }

    pub fn sort_config(&self) -> SortConfig {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortConfig) {
        self.sort = sort;
    }

    /// Header click: advance the sort state and go back to the first page
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort = self.sort.toggle(field);
        self.paginator.set_current_page(1);
    }

    pub fn current_page(&self) -> usize {
        self.paginator.current_page()
    }

    pub fn set_page(&mut self, page: usize) {
        self.paginator.set_current_page(page);
    }

    /// Build the view for `events` narrowed by `filters`
    pub fn view(&mut self, events: &[Event], filters: &ActiveFilters) -> DashboardView {
        let filtered = filters.apply(events);
        let stats = compute_stats(filtered.iter().copied());

        let sorted = sort_events(&filtered, self.sort);
        let page = self.paginator.paginate(&sorted);

        let footer_totals = compute_totals(events);
        let footer = footer_totals.as_ref().map(footer_cells).unwrap_or_default();

        let page_summary = PageSummary {
            current_page: page.current_page,
            total_pages: page.total_pages,
            items_per_page: self.paginator.items_per_page(),
            start_index: page.start_index,
            end_index: page.end_index,
            total_items: sorted.len(),
            pages: page_numbers(page.current_page, page.total_pages),
            has_previous: page.current_page > 1,
            has_next: page.current_page < page.total_pages,
            show_controls: page.total_pages > 1,
        };

        DashboardView {
            stats,
            filter_options: FilterOptions::from_events(events),
            active_filters: filters.clone(),
            columns: column_headers(self.sort),
            visible_rows: page.items.into_iter().map(EventRow::from_event).collect(),
            footer_totals,
            footer,
            page_summary,
        }
    }
}
