//! Vera Daemon - catalog assistant engine
//!
//! Loads the catalog, wires the safety and classification pipeline, and
//! keeps the rate-limit store swept. The transport surface connects to
//! `handlers::handle_chat` / `handlers::handle_compare`.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use verad::config::Config;
use verad::state::{spawn_sweeper, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Vera daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load();
    let state = Arc::new(AppState::init(config)?);
    info!(
        "Catalog ready: {} items across {} brands",
        state.catalog.len(),
        state.catalog.brands().len()
    );

    let sweeper = spawn_sweeper(state.clone());

    info!("Vera daemon ready");

    tokio::signal::ctrl_c().await?;
    sweeper.abort();
    info!("Shutting down gracefully");

    Ok(())
}
