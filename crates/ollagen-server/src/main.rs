//! Ollagen Server
//!
//! HTTP gateway in front of a local Ollama server: generates files from
//! prompts, keeps a replayable prompt history and manages uploaded context
//! files.

mod app;
mod error;
mod handlers;

use anyhow::{Context, Result};
use app::{build_router, AppState};
use ollagen_core::GatewayConfig;
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    // RUST_LOG wins; info otherwise
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Ollagen Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = GatewayConfig::load().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, backend={}, model={}",
        config.bind_address, config.backend_url, config.default_model
    );

    config
        .ensure_directories()
        .await
        .context("Failed to prepare data directories")?;
    info!(
        "Output: {}, history: {}, context: {}",
        config.output_dir.display(),
        config.history_dir.display(),
        config.context_dir.display()
    );

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;

    let state = AppState::from_config(config).context("Failed to initialize model backend")?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
