//! ServerBuilder for fluent API to build HTTP servers

use super::entity_registry::EntityRegistry;
use super::exposure::RestExposure;
use crate::config::AppConfig;
use crate::core::service::Stores;
use crate::entities;
use crate::entities::order::DEFAULT_LIST_LIMIT;
use crate::storage::InMemoryStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the bakery HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_stores(Stores::from_backend(Arc::new(InMemoryStore::new())))
///     .with_order_list_limit(100)
///     .build()?;
/// ```
pub struct ServerBuilder {
    stores: Option<Stores>,
    order_list_limit: usize,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            stores: None,
            order_list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    /// Set the storage handles (required)
    pub fn with_stores(mut self, stores: Stores) -> Self {
        self.stores = Some(stores);
        self
    }

    /// Serve everything from a fresh in-memory store
    pub fn with_in_memory_store(self) -> Self {
        self.with_stores(Stores::from_backend(Arc::new(InMemoryStore::new())))
    }

    /// Cap on the number of orders a listing returns
    pub fn with_order_list_limit(mut self, limit: usize) -> Self {
        self.order_list_limit = limit;
        self
    }

    /// Apply the settings the server reads from configuration
    pub fn with_config(self, config: &AppConfig) -> Self {
        self.with_order_list_limit(config.orders.list_limit)
    }

    /// Register every resource and build the REST router
    pub fn build(self) -> Result<Router> {
        let stores = self
            .stores
            .ok_or_else(|| anyhow::anyhow!("Stores are required. Call .with_stores()"))?;
        if self.order_list_limit == 0 {
            anyhow::bail!("order list limit must be greater than 0");
        }

        let mut registry = EntityRegistry::new();
        entities::register_all(&mut registry, &stores, self.order_list_limit);
        tracing::debug!(
            entities = ?registry.entity_types(),
            routes = ?registry.plurals(),
            "registered resources"
        );

        Ok(RestExposure::build_router(&registry))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `addr` and stops on SIGTERM or Ctrl+C.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_stores_fails() {
        let result = ServerBuilder::new().build();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Stores are required"));
    }

    #[test]
    fn test_zero_list_limit_is_rejected() {
        let result = ServerBuilder::new()
            .with_in_memory_store()
            .with_order_list_limit(0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_sets_list_limit() {
        let mut config = AppConfig::default();
        config.orders.list_limit = 5;
        let builder = ServerBuilder::new().with_config(&config);
        assert_eq!(builder.order_list_limit, 5);
    }

    #[test]
    fn test_build_with_in_memory_store() {
        assert!(ServerBuilder::new().with_in_memory_store().build().is_ok());
    }
}
