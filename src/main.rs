//! request-trace demo service.
//!
//! Serves a small catalog API with request and method tracing switched on
//! by config (`[tracing] enabled`) or `METHOD_TRACING_ENABLED`.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client Request
//!   ──────────────▶ BoundaryLayer ──▶ TimeoutLayer ──▶ handlers ──▶ Catalog
//!                   (enter event)                                   (Tracer:
//!                                                                    method
//!   Client Response                                                  events)
//!   ◀────────────── BoundaryLayer ◀──────────────────────────────────┘
//!                   (exit event: status, elapsed ms)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use request_trace::config::{loader, validation, ConfigError};
use request_trace::observability::logging;
use request_trace::HttpServer;

#[derive(Parser)]
#[command(name = "request-trace")]
#[command(about = "Catalog API with request and method tracing", long_about = None)]
struct Cli {
    /// TOML config file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override `tracing.enabled`.
    #[arg(long)]
    tracing: Option<bool>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = loader::read_or_default(cli.config.as_deref())?;

    // Before the env override so its warnings are not lost.
    logging::init(&config.logging);

    loader::apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(enabled) = cli.tracing {
        config.tracing.enabled = enabled;
    }
    validation::validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        tracing_enabled = config.tracing.enabled,
        request_timeout_secs = config.timeouts.request_secs,
        catalog_latency_ms = config.catalog.latency_ms,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
