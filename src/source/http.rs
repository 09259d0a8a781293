use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CACHE_CONTROL;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::UpstreamConfig;
use crate::models::Event;
use crate::source::{EventSource, SourceError, SourceResult};

/// Upper bound on the delay between two attempts
const MAX_RETRY_DELAY_MS: u64 = 30_000;

/// Exponential backoff: 1s, 2s, 4s, ... capped at 30s
pub fn retry_delay(attempt: u32) -> Duration {
    let millis = 1000u64
        .saturating_mul(2u64.saturating_pow(attempt))
        .min(MAX_RETRY_DELAY_MS);
    Duration::from_millis(millis)
}

/// Fetches the raw event feed over HTTP, bypassing intermediate caches
pub struct HttpEventSource {
    client: reqwest::Client,
    url: String,
    retry_count: u32,
}

impl HttpEventSource {
    pub fn new(config: &UpstreamConfig) -> SourceResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.events_url.clone(),
            retry_count: config.retry_count,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Feed URL with a timestamp parameter so no cache answers for upstream
    fn cache_busting_url(&self) -> String {
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}t={}", self.url, separator, Utc::now().timestamp_millis())
    }

    async fn fetch_once(&self) -> SourceResult<Vec<Event>> {
        let response = self
            .client
            .get(self.cache_busting_url())
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    async fn fetch_events(&self) -> SourceResult<Vec<Event>> {
        let mut attempt = 0;
        loop {
            match self.fetch_once().await {
                Ok(events) => {
                    debug!(url = %self.url, count = events.len(), "fetched events");
                    return Ok(events);
                }
                Err(err) if attempt < self.retry_count => {
                    let delay = retry_delay(attempt);
                    warn!(
                        url = %self.url,
                        attempt = attempt + 1,
                        error = %err,
                        "event fetch failed, retrying in {}ms",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_backoff() {
        assert_eq!(retry_delay(0), Duration::from_millis(1000));
        assert_eq!(retry_delay(1), Duration::from_millis(2000));
        assert_eq!(retry_delay(4), Duration::from_millis(16000));
        assert_eq!(retry_delay(5), Duration::from_millis(30000));
        assert_eq!(retry_delay(80), Duration::from_millis(30000));
    }

    #[test]
    fn test_cache_busting_url() {
        let config = UpstreamConfig {
            events_url: "http://localhost:9/events.json".to_string(),
            ..UpstreamConfig::default()
        };
        let source = HttpEventSource::new(&config).unwrap();
        assert!(source.cache_busting_url().starts_with("http://localhost:9/events.json?t="));

        let config = UpstreamConfig {
            events_url: "http://localhost:9/events?v=2".to_string(),
            ..UpstreamConfig::default()
        };
        let source = HttpEventSource::new(&config).unwrap();
        assert!(source.cache_busting_url().starts_with("http://localhost:9/events?v=2&t="));
    }
}
