//! MA'AT Engine - real-time principle resonance scoring

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use maat_engine::{config::Args, server, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Initialize tracing/logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("maat_engine={},info", args.log_level).into());
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("============================================================");
    info!("☥ MA'AT ENGINE SERVER");
    info!("============================================================");
    info!("Listen: {}", args.listen);
    info!(
        "Principles: {}",
        args.principles_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in table".to_string())
    );
    info!("Send timeout: {}ms", args.send_timeout_ms);
    info!("Max listeners: {}", args.max_listeners);
    info!("============================================================");

    let state = match AppState::from_args(args) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to load principle table: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server::run(state).await {
        error!("Server error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
