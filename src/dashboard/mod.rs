//! Event dashboard presentation pipeline
//!
//! Pure, synchronous transformations from a fetched event list to the view
//! model the dashboard renders: filtering, sorting, pagination, aggregate
//! statistics and compact page-number summaries.

pub mod aggregator;
pub mod filter;
pub mod page_numbers;
pub mod paginator;
pub mod pipeline;
pub mod sort;

pub use aggregator::{compute_stats, compute_stats_at, compute_totals, EventStats, EventTotals};
pub use filter::{ActiveFilters, FilterDimension, FilterOptions, ParamStore};
pub use page_numbers::{page_numbers, PageMarker};
pub use paginator::{Page, Paginator};
pub use pipeline::{DashboardSession, DashboardView, EventDetail, EventRow, PageSummary};
pub use sort::{sort_events, SortConfig, SortDirection, SortField, SortIndicator};
