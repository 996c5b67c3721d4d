use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use travel_recs::{
    catalog::{self, CatalogHandle, CatalogSource},
    config::Config,
    db::{self, Cache, MemoryStore, PgStore},
    routes::{create_router, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("travel_recs=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let http_client = reqwest::Client::new();

    // Nothing is served until the catalog is in memory
    let catalog_source = CatalogSource::parse(&config.catalog_source);
    let store = catalog::load(&catalog_source, &http_client)
        .await
        .context("Destination catalog could not be loaded")?;
    tracing::info!(destinations = store.len(), "Catalog ready");
    let catalog = CatalogHandle::new(store);

    let (cache, cache_handle) = match &config.redis_url {
        Some(url) => {
            let client = db::create_redis_client(url)?;
            let (cache, handle) = Cache::new(client);
            (Some(cache), Some(handle))
        }
        None => {
            tracing::warn!("REDIS_URL not set, analytics responses are not cached");
            (None, None)
        }
    };

    let state = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url).await?;
            tracing::info!("Connected to PostgreSQL");
            AppState::new(
                catalog,
                catalog_source,
                http_client,
                Arc::new(PgStore::new(pool)),
                cache,
                config.analytics_cache_ttl_secs,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set, preferences and ratings are kept in memory");
            AppState::new(
                catalog,
                catalog_source,
                http_client,
                Arc::new(MemoryStore::new()),
                cache,
                config.analytics_cache_ttl_secs,
            )
        }
    };

    let app = create_router(Arc::new(state));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
