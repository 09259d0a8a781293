use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::models::Event;
use crate::source::{EventSource, SourceResult};

/// Serves a fixed event list; counts how often it was asked
pub struct StaticEventSource {
    events: Vec<Event>,
    fetches: AtomicUsize,
}

impl StaticEventSource {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Load a JSON array of events from disk
    pub async fn from_file(path: impl AsRef<Path>) -> SourceResult<Self> {
        let raw = tokio::fs::read(path).await?;
        let events: Vec<Event> = serde_json::from_slice(&raw)?;
        Ok(Self::new(events))
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl EventSource for StaticEventSource {
    async fn fetch_events(&self) -> SourceResult<Vec<Event>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        Ok(self.events.clone())
    }
}
