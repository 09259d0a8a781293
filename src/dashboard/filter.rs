//! Exact-match filters over the type, country and status dimensions

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterDimension {
    Type,
    Country,
    Status,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 3] = [
        FilterDimension::Type,
        FilterDimension::Country,
        FilterDimension::Status,
    ];

    /// Key under which this dimension lives in the parameter store
    pub fn key(&self) -> &'static str {
        match self {
            FilterDimension::Type => "type",
            FilterDimension::Country => "country",
            FilterDimension::Status => "status",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterDimension::Type => "Event Type",
            FilterDimension::Country => "Country",
            FilterDimension::Status => "Status",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            FilterDimension::Type => "All Types",
            FilterDimension::Country => "All Countries",
            FilterDimension::Status => "All Statuses",
        }
    }

    fn project<'a>(&self, event: &'a Event) -> &'a str {
        match self {
            FilterDimension::Type => &event.event_type,
            FilterDimension::Country => event.country_name(),
            FilterDimension::Status => &event.status,
        }
    }
}

/// External key-value store the filters are read from and written back to
/// (URL query parameters in a browser)
pub trait ParamStore {
    fn get_param(&self, key: &str) -> Option<&str>;
    fn set_param(&mut self, key: &str, value: &str);
    fn remove_param(&mut self, key: &str);
}

impl ParamStore for BTreeMap<String, String> {
    fn get_param(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }

    fn set_param(&mut self, key: &str, value: &str) {
        self.insert(key.to_string(), value.to_string());
    }

    fn remove_param(&mut self, key: &str) {
        self.remove(key);
    }
}

impl ParamStore for HashMap<String, String> {
    fn get_param(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }

    fn set_param(&mut self, key: &str, value: &str) {
        self.insert(key.to_string(), value.to_string());
    }

    fn remove_param(&mut self, key: &str) {
        self.remove(key);
    }
}

/// Currently selected value per dimension. Empty selections are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActiveFilters {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ActiveFilters {
    pub fn get(&self, dimension: FilterDimension) -> Option<&str> {
        match dimension {
            FilterDimension::Type => self.event_type.as_deref(),
            FilterDimension::Country => self.country.as_deref(),
            FilterDimension::Status => self.status.as_deref(),
        }
    }

    /// Select `value` for `dimension`; an empty value clears it
    pub fn set(&mut self, dimension: FilterDimension, value: Option<&str>) {
        let value = value.filter(|v| !v.is_empty()).map(str::to_string);
        match dimension {
            FilterDimension::Type => self.event_type = value,
            FilterDimension::Country => self.country = value,
            FilterDimension::Status => self.status = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        FilterDimension::ALL.iter().all(|d| self.get(*d).is_none())
    }

    pub fn from_store<S: ParamStore + ?Sized>(store: &S) -> Self {
        let mut filters = Self::default();
        for dimension in FilterDimension::ALL {
            filters.set(dimension, store.get_param(dimension.key()));
        }
        filters
    }

    /// Mirror these filters into `store`, deleting keys for cleared dimensions
    pub fn write_to<S: ParamStore + ?Sized>(&self, store: &mut S) {
        for dimension in FilterDimension::ALL {
            match self.get(dimension) {
                Some(value) => store.set_param(dimension.key(), value),
                None => store.remove_param(dimension.key()),
            }
        }
    }

    /// Update one dimension directly in `store`
    pub fn update_store<S: ParamStore + ?Sized>(
        store: &mut S,
        dimension: FilterDimension,
        value: Option<&str>,
    ) {
        match value.filter(|v| !v.is_empty()) {
            Some(value) => store.set_param(dimension.key(), value),
            None => store.remove_param(dimension.key()),
        }
    }

    /// Drop every filter key from `store`
    pub fn reset_store<S: ParamStore + ?Sized>(store: &mut S) {
        for dimension in FilterDimension::ALL {
            store.remove_param(dimension.key());
        }
    }

    pub fn matches(&self, event: &Event) -> bool {
        FilterDimension::ALL.iter().all(|dimension| match self.get(*dimension) {
            Some(wanted) => dimension.project(event) == wanted,
            None => true,
        })
    }

    /// Events passing every active filter, in input order
    pub fn apply<'a>(&self, events: &'a [Event]) -> Vec<&'a Event> {
        events.iter().filter(|event| self.matches(event)).collect()
    }
}

/// Distinct values offered for each dimension, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    #[serde(rename = "type")]
    pub event_type: Vec<String>,
    pub country: Vec<String>,
    pub status: Vec<String>,
}

impl FilterOptions {
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut options = Self::default();
        for event in events {
            push_unique(&mut options.event_type, &event.event_type);
            push_unique(&mut options.country, event.country_name());
            push_unique(&mut options.status, &event.status);
        }
        options
    }

    pub fn values(&self, dimension: FilterDimension) -> &[String] {
        match dimension {
            FilterDimension::Type => &self.event_type,
            FilterDimension::Country => &self.country,
            FilterDimension::Status => &self.status,
        }
    }
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}
