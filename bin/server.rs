// Customer Ledger - Web Server

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use customer_ledger::{router, AppState, ServerConfig, VERSION};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::parse();
    info!("Customer Ledger v{} starting", VERSION);

    let state = AppState::from_config(&config);
    if config.empty {
        info!("Starting with an empty registry");
    }

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!("Server running on http://{}", config.bind);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
