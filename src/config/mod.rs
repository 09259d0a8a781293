use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const DEFAULT_EVENTS_URL: &str = "https://cdn.timeleft.com/frontend-tech-test/events.json";
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub rate_limit: RateLimitConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Source of the raw event feed
    pub events_url: String,
    /// How long a fetched list is served from cache
    pub cache_ttl_secs: u64,
    /// Age after which the cached list is reported as stale
    pub stale_after_secs: u64,
    /// Background refresh period, 0 disables it
    pub refresh_interval_secs: u64,
    /// Extra attempts after a failed fetch
    pub retry_count: u32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub max_requests: u32,
    pub window_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub items_per_page: usize,
}

impl UpstreamConfig {
    const fn default_cache_ttl_secs() -> u64 {
        30
    }

    const fn default_stale_after_secs() -> u64 {
        15
    }

    const fn default_refresh_interval_secs() -> u64 {
        30
    }

    const fn default_retry_count() -> u32 {
        3
    }

    const fn default_request_timeout_secs() -> u64 {
        10
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            events_url: DEFAULT_EVENTS_URL.to_string(),
            cache_ttl_secs: Self::default_cache_ttl_secs(),
            stale_after_secs: Self::default_stale_after_secs(),
            refresh_interval_secs: Self::default_refresh_interval_secs(),
            retry_count: Self::default_retry_count(),
            request_timeout_secs: Self::default_request_timeout_secs(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 60,
            window_secs: 60,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_host = var("API_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let api_port = var("API_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("API_PORT must be a valid port number")?;

        let upstream_defaults = UpstreamConfig::default();
        let events_url = var("EVENTS_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(upstream_defaults.events_url);

        let cache_ttl_secs = parse_or(&var, "EVENTS_CACHE_TTL_SECS", upstream_defaults.cache_ttl_secs);
        let stale_after_secs = parse_or(&var, "EVENTS_STALE_SECS", upstream_defaults.stale_after_secs);
        let refresh_interval_secs = parse_or(
            &var,
            "EVENTS_REFRESH_INTERVAL_SECS",
            upstream_defaults.refresh_interval_secs,
        );
        let retry_count = parse_or(&var, "EVENTS_RETRY_COUNT", upstream_defaults.retry_count);
        let request_timeout_secs = parse_or(
            &var,
            "EVENTS_REQUEST_TIMEOUT_SECS",
            upstream_defaults.request_timeout_secs,
        );

        let rate_defaults = RateLimitConfig::default();
        let rate_limit_enabled = var("RATE_LIMIT_ENABLED")
            .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(rate_defaults.enabled);
        let max_requests = parse_or(&var, "RATE_LIMIT_MAX_REQUESTS", rate_defaults.max_requests);
        let window_secs = parse_or(&var, "RATE_LIMIT_WINDOW_SECS", rate_defaults.window_secs);

        let items_per_page = parse_or(&var, "ITEMS_PER_PAGE", DEFAULT_ITEMS_PER_PAGE);
        if items_per_page == 0 {
            anyhow::bail!("ITEMS_PER_PAGE must be greater than zero");
        }

        Ok(Config {
            api_server: ServerConfig {
                host: api_host,
                port: api_port,
            },
            upstream: UpstreamConfig {
                events_url,
                cache_ttl_secs,
                stale_after_secs,
                refresh_interval_secs,
                retry_count,
                request_timeout_secs,
            },
            rate_limit: RateLimitConfig {
                enabled: rate_limit_enabled,
                max_requests,
                window_secs,
            },
            dashboard: DashboardConfig { items_per_page },
        })
    }
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match var(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            tracing::warn!("Invalid value '{raw}' for {key}, falling back to the default");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_server.host, "127.0.0.1");
        assert_eq!(config.api_server.port, 8080);
        assert_eq!(config.upstream.events_url, DEFAULT_EVENTS_URL);
        assert_eq!(config.upstream.cache_ttl_secs, 30);
        assert_eq!(config.upstream.stale_after_secs, 15);
        assert_eq!(config.upstream.retry_count, 3);
        assert!(config.rate_limit.enabled);
        assert_eq!(config.rate_limit.max_requests, 60);
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.dashboard.items_per_page, 10);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("API_PORT", "9090"),
            ("EVENTS_URL", "http://localhost:4000/events.json"),
            ("RATE_LIMIT_ENABLED", "false"),
            ("RATE_LIMIT_MAX_REQUESTS", "5"),
            ("ITEMS_PER_PAGE", "25"),
        ])
        .unwrap();
        assert_eq!(config.api_server.port, 9090);
        assert_eq!(config.upstream.events_url, "http://localhost:4000/events.json");
        assert!(!config.rate_limit.enabled);
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.dashboard.items_per_page, 25);
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let config = config_from(&[("EVENTS_CACHE_TTL_SECS", "soon")]).unwrap();
        assert_eq!(config.upstream.cache_ttl_secs, 30);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        assert!(config_from(&[("API_PORT", "eighty")]).is_err());
        assert!(config_from(&[("ITEMS_PER_PAGE", "0")]).is_err());
    }
}
