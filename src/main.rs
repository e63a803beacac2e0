//! Book BFF service.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────────┐
//!                      │                     BOOK BFF                      │
//!                      │                                                   │
//!   Client Request     │  ┌─────────┐    ┌──────────┐    ┌────────────┐   │
//!   ───────────────────┼─▶│  http   │───▶│   auth   │───▶│  handlers  │   │
//!   (web / mobile)     │  │ server  │    │  (JWT)   │    └─────┬──────┘   │
//!                      │  └─────────┘    └──────────┘          │          │
//!                      │                        ┌──────────────┴───────┐  │
//!                      │                        ▼                      ▼  │
//!                      │              ┌──────────────┐    ┌──────────────┐│
//!                      │              │   catalog    │    │ circuit gate ││
//!                      │              │   forward    │    │ + recommend. ││
//!                      │              │              │    │    client    ││
//!                      │              └──────┬───────┘    └──────┬───────┘│
//!                      └─────────────────────┼───────────────────┼────────┘
//!                                            ▼                   ▼
//!                                      Book Service        Recommendation
//!                                        backend               Engine
//! ```
//!
//! The gate is the failure-isolation core: one timed-out recommendation call
//! opens the circuit, callers fail fast for the reset window, and the first
//! call after the window goes through unconditionally.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use book_bff::config::{loader::load_config, BffConfig};
use book_bff::http::HttpServer;
use book_bff::lifecycle::Shutdown;
use book_bff::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "book-bff")]
#[command(about = "Book BFF with circuit-gated recommendations", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logging::init_logging("book_bff=debug,tower_http=debug");

    tracing::info!("book-bff v0.1.0 starting");

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BffConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        catalog = %config.catalog.address,
        recommendations = %config.recommendations.address,
        request_timeout_ms = config.recommendations.request_timeout_ms,
        reset_window_secs = config.recommendations.reset_window_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
