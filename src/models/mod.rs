mod event;

pub use event::{parse_event_date, City, Country, Event, Zone, INVALID_DATE};
