use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::time::Duration;

use crate::config::RateLimitConfig;

/// Chance that a request also sweeps expired windows
const CLEANUP_PROBABILITY: f64 = 0.1;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Outcome of counting one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

impl RateLimitStatus {
    /// Whole seconds until the window resets, rounded up
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> i64 {
        let millis = self.reset_at.signed_duration_since(now).num_milliseconds();
        (millis.max(0) + 999) / 1000
    }
}

/// Fixed-window request counter keyed by client identity
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_secs))
    }

    pub fn check(&self, client: &str) -> RateLimitStatus {
        let status = self.check_at(client, Utc::now());

        if rand::random::<f64>() < CLEANUP_PROBABILITY {
            self.sweep_expired(Utc::now());
        }

        status
    }

    /// Count a request from `client` at `now`
    pub fn check_at(&self, client: &str, now: DateTime<Utc>) -> RateLimitStatus {
        let fresh = || Window {
            count: 0,
            reset_at: self.window_end(now),
        };

        let mut entry = self.windows.entry(client.to_string()).or_insert_with(fresh);
        if now > entry.reset_at {
            *entry = fresh();
        }
        entry.count = entry.count.saturating_add(1);

        RateLimitStatus {
            allowed: entry.count <= self.max_requests,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.count),
            reset_at: entry.reset_at,
        }
    }

    /// Forget every window that has already reset
    pub fn sweep_expired(&self, now: DateTime<Utc>) {
        self.windows.retain(|_, window| now <= window.reset_at);
    }

    /// Number of clients currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    fn window_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        chrono::Duration::from_std(self.window)
            .ok()
            .and_then(|window| now.checked_add_signed(window))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
