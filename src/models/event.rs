use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display text used when an event date cannot be parsed
pub const INVALID_DATE: &str = "Invalid Date";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub country: Country,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: i64,
    pub name: String,
    pub city: City,
}

/// A bookable event as delivered by the upstream feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub date: String,
    pub zone: Zone,
    pub booked: u64,
    pub capacity: u64,
    pub status: String,
}

impl Event {
    /// Name of the country this event takes place in
    pub fn country_name(&self) -> &str {
        &self.zone.city.country.name
    }

    /// Name of the city this event takes place in
    pub fn city_name(&self) -> &str {
        &self.zone.city.name
    }

    /// Parsed event date, `None` when the date string is malformed
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_event_date(&self.date)
    }

    /// Short US-style date (`M/D/YYYY`), or `Invalid Date`
    pub fn display_date(&self) -> String {
        match self.timestamp() {
            Some(ts) => ts.format("%-m/%-d/%Y").to_string(),
            None => INVALID_DATE.to_string(),
        }
    }
}

/// Parse an ISO-8601 event date.
///
/// Accepts RFC 3339 timestamps, offset-less date-times (read as UTC) and
/// bare calendar dates (UTC midnight).
pub fn parse_event_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
