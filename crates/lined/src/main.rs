//! Line Daemon - serves lines of large text datasets over HTTP

mod config;
mod handler;

use anyhow::{Context, Result};
use clap::Parser;
use linecache::CachedLineLookup;
use linestore::Dataset;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use crate::config::Config;
use crate::handler::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = Config::parse();

    // Health check
    if config.health {
        match TcpStream::connect(&config.bind).await {
            Ok(_) => {
                println!("OK");
                std::process::exit(0);
            }
            Err(_) => {
                eprintln!("FAILED");
                std::process::exit(1);
            }
        }
    }

    let capacity = config.cache_capacity()?;

    info!("Starting Line Daemon v{}", env!("CARGO_PKG_VERSION"));
    info!("Binding to {}", config.bind);
    info!("Data directory: {}", config.data);
    info!("Cache capacity: {} lines", capacity);

    if !std::path::Path::new(&config.data).is_dir() {
        warn!("Data directory {} does not exist yet", config.data);
    }

    let lookup = Arc::new(CachedLineLookup::new(Dataset::new(&config.data), capacity));
    let app = handler::router(AppState::new(lookup));

    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("Server listening on {}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

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
