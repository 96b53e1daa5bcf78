//! Belle Croissant HTTP server
//!
//! Reads configuration from `BAKERY_CONFIG` and the environment, picks the
//! PostgreSQL store when a database URL is configured, otherwise serves from
//! memory.

use anyhow::Result;
use bakery::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str())),
        )
        .init();

    let stores = connect_stores(&config).await?;

    ServerBuilder::new()
        .with_stores(stores)
        .with_config(&config)
        .serve(&config.address())
        .await
}

#[cfg(feature = "postgres")]
async fn connect_stores(config: &AppConfig) -> Result<Stores> {
    let Some(url) = config.database.url.as_deref() else {
        tracing::warn!("No DATABASE_URL configured, using the in-memory store");
        return Ok(Stores::from_backend(Arc::new(InMemoryStore::new())));
    };

    let store = PostgresStore::connect(url, config.database.max_connections).await?;
    bakery::storage::ensure_schema(store.pool()).await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        "Connected to PostgreSQL"
    );
    Ok(Stores::from_backend(Arc::new(store)))
}

#[cfg(not(feature = "postgres"))]
async fn connect_stores(config: &AppConfig) -> Result<Stores> {
    if config.database.url.is_some() {
        tracing::warn!("DATABASE_URL is set but the postgres feature is disabled, using the in-memory store");
    } else {
        tracing::info!("Using the in-memory store");
    }
    Ok(Stores::from_backend(Arc::new(InMemoryStore::new())))
}
