//! # Oracle - PinHash game server
//!
//! Shows the SHA-256 digest of a hidden 3-digit number, checks guesses
//! against it and can brute-force the answer on request.
//!
//! ## Architecture
//! ```text
//! Browser / curl → Oracle → Store (file | Redis | memory)
//!                    ↓
//!              Search Engine
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod backend;
mod config;
mod routes;
mod state;

use crate::config::{AppConfig, StoreBackend};
use crate::state::AppState;

/// PinHash Oracle - digest guessing game server
#[derive(Parser, Debug)]
#[command(name = "oracle")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/oracle.toml")]
    config: String,

    /// Listen address (overrides config)
    #[arg(short, long, env = "LISTEN_ADDR")]
    listen: Option<String>,

    /// Store backend (overrides config)
    #[arg(long, value_enum, env = "PINHASH_STORE_BACKEND")]
    store: Option<StoreBackend>,

    /// Redis URL (overrides config)
    #[arg(long, env = "REDIS_URL")]
    redis_url: Option<String>,

    /// File store path (overrides config)
    #[arg(long, env = "PINHASH_STORE")]
    store_file: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up .env before clap reads env fallbacks
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level, args.json_logs)?;

    info!("🔐 Starting PinHash Oracle v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load(&args.config, &args)?;
    info!("📋 Configuration loaded from {}", args.config);

    // Initialize application state
    let state = AppState::new(config.clone()).await?;
    info!(
        store = state.puzzle.secrets.backend(),
        domain = %state.puzzle.domain(),
        "✅ Puzzle ready"
    );

    // Build router
    let app = routes::create_router(state.clone());

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!("🚀 Oracle listening on {}", config.listen_addr);

    // Handle graceful shutdown; running solves are cancelled, never the store
    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            return;
        }
        info!("🛑 Shutdown signal received");
        let cancelled = state.cancel_searches().await;
        if cancelled > 0 {
            info!(cancelled, "Cancelled running solves");
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("Server error")?;

    info!("👋 Oracle shutdown complete");
    Ok(())
}

/// Initialize structured logging with tracing
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .init();
    }

    Ok(())
}
