//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catalog handlers
//! - Wire up middleware (timeout, request tracing)
//! - Bind server to listener and shut down gracefully

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;

use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::http::handlers::{self, AppState};
use crate::http::registration::{RouterTraceExt, TraceModule, TraceRegistration};
use crate::trace::{TraceSink, TracingSink};

/// HTTP server for the demo catalog API.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    registration: TraceRegistration,
}

impl HttpServer {
    /// Create a new HTTP server logging through `tracing`.
    pub fn new(config: AppConfig) -> Self {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    /// Create a new HTTP server recording trace events into `sink`.
    pub fn with_sink(config: AppConfig, sink: Arc<dyn TraceSink>) -> Self {
        let registration = TraceModule::for_root(&config.tracing, sink);
        let state = AppState {
            catalog: Catalog::new(registration.tracer())
                .with_latency(Duration::from_millis(config.catalog.latency_ms)),
        };

        let router = Self::build_router(&config, state, &registration);
        Self {
            router,
            config,
            registration,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState, registration: &TraceRegistration) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/items", get(handlers::list_items).post(handlers::create_item))
            .route("/items/{id}", get(handlers::get_item))
            .route("/items/{id}/quote", get(handlers::quote_item))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .with_request_tracing(registration)
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registration(&self) -> &TraceRegistration {
        &self.registration
    }

    /// Run the server until Ctrl+C.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        self.run_until(listener, shutdown_signal()).await
    }

    /// Run the server until `shutdown` completes.
    pub async fn run_until<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            tracing_enabled = self.registration.is_enabled(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
