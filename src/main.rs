use book_finder::catalog::client::CatalogClient;
use book_finder::config::AppConfig;
use book_finder::search::cache::ResultCache;
use book_finder::search::cards::CardOptions;
use book_finder::search::handlers::{AppState, router};
use book_finder::search::registry::SessionRegistry;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?.apply_args(std::env::args().skip(1))?;

    // 1. Catalog client:
    let client = CatalogClient::new(&config.catalog_url).with_timeout(config.request_timeout);
    tracing::info!("Catalog endpoint: {}", client.endpoint());

    // 2. Shared result cache and per-client sessions:
    let cache = Arc::new(ResultCache::new(config.cache_ttl));
    tracing::info!(
        "Result limit {} | cache TTL {}s | session idle {}s",
        config.search_limit,
        cache.ttl().as_secs(),
        config.session_idle.as_secs()
    );

    let sessions = Arc::new(
        SessionRegistry::new(Arc::new(client), cache.clone())
            .with_limit(config.search_limit)
            .with_covers_base(&config.covers_url),
    );

    let state = AppState {
        sessions: sessions.clone(),
        card_options: Arc::new(CardOptions {
            site_url: config.site_url.clone(),
            ..CardOptions::default()
        }),
    };

    // 3. Periodic purge of expired cache entries and idle sessions:
    let purge_interval = cache.ttl().min(config.session_idle).max(Duration::from_secs(1));
    let session_idle = config.session_idle;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(purge_interval);

        loop {
            interval.tick().await;
            let expired = cache.purge_expired();
            let idle = sessions.purge_idle(session_idle);
            if expired > 0 || idle > 0 {
                tracing::debug!(
                    "Purged {} expired cache entries, {} idle sessions ({} active)",
                    expired,
                    idle,
                    sessions.len()
                );
            }
        }
    });

    // 4. HTTP server:
    let app = router(state);

    tracing::info!("Book finder listening on {}", config.bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
