use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use eventdash::api;
use eventdash::config::Config;
use eventdash::source::{CachedEventSource, EventSource, HttpEventSource};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("eventdash=info")),
        )
        .init();

    let config = Config::from_env()?;
    info!("Loaded configuration");

    let upstream = HttpEventSource::new(&config.upstream)?;
    info!("Fetching events from {}", upstream.url());

    let inner: Arc<dyn EventSource> = Arc::new(upstream);
    let source = Arc::new(CachedEventSource::new(
        inner,
        Duration::from_secs(config.upstream.cache_ttl_secs),
        Duration::from_secs(config.upstream.stale_after_secs),
    ));

    // Warm the cache; a failure here is retried on the first request
    match source.events().await {
        Ok(events) => info!("Loaded {} events", events.len()),
        Err(e) => warn!("Initial event fetch failed: {}", e),
    }

    let refresh_task = if config.upstream.refresh_interval_secs > 0 {
        info!(
            "Refreshing events every {}s",
            config.upstream.refresh_interval_secs
        );
        Some(source.start_refresh_task(Duration::from_secs(
            config.upstream.refresh_interval_secs,
        )))
    } else {
        None
    };

    if config.rate_limit.enabled {
        info!(
            "Rate limiting: {} requests per {}s per client",
            config.rate_limit.max_requests, config.rate_limit.window_secs
        );
    } else {
        info!("Rate limiting is disabled");
    }

    let router = api::create_api_router(Arc::clone(&source), &config);

    let addr = format!("{}:{}", config.api_server.host, config.api_server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on http://{}", addr);
    info!("   - Dashboard available at http://{}/api/dashboard", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    source.shutdown();
    if let Some(task) = refresh_task {
        let _ = task.await;
    }
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
