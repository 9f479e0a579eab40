//! Spottive Gateway
//!
//! Access-control gate for the Spottive marketing site's admin API.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────┐
//!                    │                 GATEWAY                        │
//!                    │                                                │
//!   Client Request   │  ┌─────────┐   ┌───────────┐   ┌───────────┐  │
//!   ─────────────────┼─▶│  http   │──▶│   guard   │──▶│   admin   │  │
//!                    │  │ server  │   │  pipeline │   │  handlers │  │
//!                    │  └─────────┘   └─────┬─────┘   └───────────┘  │
//!                    │                      │                        │
//!                    │        normalize → origin → token             │
//!                    │                                                │
//!                    │  ┌──────────────────────────────────────────┐ │
//!                    │  │          Cross-Cutting Concerns           │ │
//!                    │  │  ┌────────┐ ┌────────────┐ ┌──────────┐  │ │
//!                    │  │  │ config │ │ observa-   │ │lifecycle │  │ │
//!                    │  │  │        │ │ bility     │ │          │  │ │
//!                    │  │  └────────┘ └────────────┘ └──────────┘  │ │
//!                    │  └──────────────────────────────────────────┘ │
//!                    └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use spottive_gateway::config::loader::{load_config, Secrets};
use spottive_gateway::config::validation::validate_config;
use spottive_gateway::observability::{logging, metrics};
use spottive_gateway::{GatewayConfig, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "spottive-gateway", about = "Access-control gate for the Spottive admin API")]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration before logging so the configured level applies.
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let config = GatewayConfig::default();
            validate_config(&config).map_err(|errors| {
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            })?;
            config
        }
    };

    logging::init_tracing(&config.observability.log_level);

    tracing::info!("spottive-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    // Secrets have no defaults: a missing variable aborts startup here.
    let secrets = Secrets::from_env()?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        request_timeout_secs = config.timeouts.request_secs,
        token_ttl_secs = config.auth.token_ttl_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, secrets);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        spottive_gateway::lifecycle::signals::wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
