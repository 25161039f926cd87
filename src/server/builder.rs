//! ServerBuilder for fluent API to build the HTTP server

use super::handlers::AppState;
use super::router::build_toy_routes;
use crate::core::store::ToyStore;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the gateway's HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryToyStore::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn ToyStore>>,
    custom_routes: Vec<Router>,
    cors: bool,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with permissive CORS enabled
    pub fn new() -> Self {
        Self {
            store: None,
            custom_routes: Vec::new(),
            cors: true,
        }
    }

    /// Set the toy store (required)
    pub fn with_store(self, store: impl ToyStore + 'static) -> Self {
        self.with_shared_store(Arc::new(store))
    }

    /// Set an already shared toy store
    pub fn with_shared_store(mut self, store: Arc<dyn ToyStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Disable the permissive CORS layer
    pub fn without_cors(mut self) -> Self {
        self.cors = false;
        self
    }

    /// Build the final router with request tracing and CORS layers
    pub fn build(self) -> Result<Router> {
        let store = self
            .store
            .ok_or_else(|| anyhow::anyhow!("ToyStore is required. Call .with_store()"))?;

        let mut app = build_toy_routes(AppState::new(store));
        for custom_router in self.custom_routes {
            app = app.merge(custom_router);
        }

        if self.cors {
            app = app.layer(CorsLayer::permissive());
        }

        Ok(app.layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("driven is running on {}", addr);

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

/// Prepare the store before the listener starts.
///
/// Creates indexes and pings the backend. Failures are logged and swallowed:
/// the listener starts regardless and routes fail per request until the
/// backend becomes reachable.
pub async fn bootstrap_store(store: &dyn ToyStore) -> bool {
    let mut healthy = true;

    match store.ensure_indexes().await {
        Ok(()) => tracing::info!("Indexes ensured"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create indexes");
            healthy = false;
        }
    }

    match store.ping().await {
        Ok(()) => tracing::info!("Pinged your deployment. Storage is reachable"),
        Err(e) => {
            tracing::error!(error = %e, "Storage ping failed");
            healthy = false;
        }
    }

    healthy
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
