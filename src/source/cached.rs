use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time;

use crate::models::Event;
use crate::source::{EventSource, SourceError, SourceResult};

const EVENTS_KEY: &str = "events";
const NEVER: i64 = i64::MIN;

/// Freshness of the cached event list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchStatus {
    pub last_updated: Option<DateTime<Utc>>,
    pub is_fetching: bool,
    pub is_stale: bool,
}

/// Raises the fetching flag and lowers it on drop, including when the
/// fetch future is cancelled
struct FetchingGuard<'a>(&'a AtomicBool);

impl<'a> FetchingGuard<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for FetchingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Read-through cache in front of an upstream event source.
///
/// Concurrent callers share a single upstream fetch; the list is kept for
/// the cache TTL and reported stale after `stale_after`.
pub struct CachedEventSource {
    inner: Arc<dyn EventSource>,
    cache: Cache<&'static str, Arc<Vec<Event>>>,
    last_updated_ms: AtomicI64,
    fetching: AtomicBool,
    stale_after: Duration,
    shutdown_tx: watch::Sender<bool>,
}

impl CachedEventSource {
    pub fn new(inner: Arc<dyn EventSource>, ttl: Duration, stale_after: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            inner,
            cache,
            last_updated_ms: AtomicI64::new(NEVER),
            fetching: AtomicBool::new(false),
            stale_after,
            shutdown_tx,
        }
    }

    /// Current event list, fetched upstream on a cache miss
    pub async fn events(&self) -> SourceResult<Arc<Vec<Event>>> {
        let load = async {
            let result = {
                let _fetching = FetchingGuard::start(&self.fetching);
                self.inner.fetch_events().await
            };

            let events = result?;
            self.last_updated_ms
                .store(Utc::now().timestamp_millis(), Ordering::SeqCst);
            tracing::info!(count = events.len(), "event cache refreshed");
            Ok::<_, SourceError>(Arc::new(events))
        };

        self.cache
            .try_get_with(EVENTS_KEY, load)
            .await
            .map_err(SourceError::from)
    }

    /// Drop the cached list and fetch a new one
    pub async fn refresh(&self) -> SourceResult<Arc<Vec<Event>>> {
        self.cache.invalidate(&EVENTS_KEY).await;
        self.events().await
    }

    pub fn status(&self) -> FetchStatus {
        let last_updated = match self.last_updated_ms.load(Ordering::SeqCst) {
            NEVER => None,
            millis => DateTime::from_timestamp_millis(millis),
        };

        let is_stale = match last_updated {
            Some(at) => Utc::now()
                .signed_duration_since(at)
                .to_std()
                .map(|age| age >= self.stale_after)
                .unwrap_or(false),
            None => true,
        };

        FetchStatus {
            last_updated,
            is_fetching: self.fetching.load(Ordering::SeqCst),
            is_stale,
        }
    }

    /// Refresh the list every `interval` until `shutdown` is called
    pub fn start_refresh_task(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let source = Arc::clone(self);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            // First tick fires immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = source.refresh().await {
                            tracing::error!("Failed to refresh events: {}", e);
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Shutdown signal received, stopping event refresh");
                            break;
                        }
                    }
                }
            }
        })
    }

    /// Stop the background refresh task
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

#[async_trait]
impl EventSource for CachedEventSource {
    async fn fetch_events(&self) -> SourceResult<Vec<Event>> {
        Ok(self.events().await?.as_ref().clone())
    }
}
