//! Column sorting with a three-state toggle per column

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Type,
    Country,
    City,
    Date,
    Capacity,
    Status,
    Booked,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::Type,
        SortField::Country,
        SortField::City,
        SortField::Date,
        SortField::Capacity,
        SortField::Status,
        SortField::Booked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Type => "type",
            SortField::Country => "country",
            SortField::City => "city",
            SortField::Date => "date",
            SortField::Capacity => "capacity",
            SortField::Status => "status",
            SortField::Booked => "booked",
        }
    }

    fn key<'a>(&self, event: &'a Event) -> SortKey<'a> {
        match self {
            SortField::Type => SortKey::Text(&event.event_type),
            SortField::Country => SortKey::Text(event.country_name()),
            SortField::City => SortKey::Text(event.city_name()),
            SortField::Date => SortKey::Time(event.timestamp().map(|ts| ts.timestamp_millis())),
            SortField::Capacity => SortKey::Number(event.capacity),
            SortField::Status => SortKey::Text(&event.status),
            SortField::Booked => SortKey::Number(event.booked),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown sort field '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

/// Projected value a column sorts by
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey<'a> {
    Text(&'a str),
    Number(u64),
    /// Epoch millis; unparseable dates sort after every valid one
    Time(Option<i64>),
}

impl SortKey<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Time(a), SortKey::Time(b)) => match (a, b) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            _ => self.cmp(other),
        }
    }
}

/// Active sort of the events table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortConfig {
    #[default]
    Unsorted,
    Sorted(SortField, SortDirection),
}

impl SortConfig {
    /// Build from loose parts; a field without a direction (or the reverse)
    /// is unsorted
    pub fn from_parts(field: Option<SortField>, direction: Option<SortDirection>) -> Self {
        match (field, direction) {
            (Some(field), Some(direction)) => SortConfig::Sorted(field, direction),
            _ => SortConfig::Unsorted,
        }
    }

    pub fn field(&self) -> Option<SortField> {
        match self {
            SortConfig::Sorted(field, _) => Some(*field),
            SortConfig::Unsorted => None,
        }
    }

    pub fn direction(&self) -> Option<SortDirection> {
        match self {
            SortConfig::Sorted(_, direction) => Some(*direction),
            SortConfig::Unsorted => None,
        }
    }

    /// Next state after the user selects `field`.
    ///
    /// Re-selecting the active column walks asc -> desc -> unsorted;
    /// any other column starts over at asc.
    pub fn toggle(self, field: SortField) -> Self {
        match self {
            SortConfig::Sorted(active, SortDirection::Asc) if active == field => {
                SortConfig::Sorted(field, SortDirection::Desc)
            }
            SortConfig::Sorted(active, SortDirection::Desc) if active == field => {
                SortConfig::Unsorted
            }
            _ => SortConfig::Sorted(field, SortDirection::Asc),
        }
    }

    /// Header indicator for a column sorted by `field`
    pub fn indicator(&self, field: SortField) -> SortIndicator {
        match self {
            SortConfig::Sorted(active, SortDirection::Asc) if *active == field => {
                SortIndicator::Ascending
            }
            SortConfig::Sorted(active, SortDirection::Desc) if *active == field => {
                SortIndicator::Descending
            }
            _ => SortIndicator::Inactive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortIndicator {
    Ascending,
    Descending,
    Inactive,
}

impl SortIndicator {
    /// Arrow drawn next to the header label
    pub fn arrow(&self) -> Option<&'static str> {
        match self {
            SortIndicator::Ascending => Some("↑"),
            SortIndicator::Descending => Some("↓"),
            SortIndicator::Inactive => None,
        }
    }
}

/// Order `events` by `config`. Unsorted returns the input order; ties keep
/// their relative input order in both directions.
pub fn sort_events<'a>(events: &[&'a Event], config: SortConfig) -> Vec<&'a Event> {
    let mut sorted = events.to_vec();

    if let SortConfig::Sorted(field, direction) = config {
        sorted.sort_by(|a, b| {
            let ordering = field.key(a).compare(&field.key(b));
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    sorted
}
