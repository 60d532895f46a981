//! Helper agent server
//!
//! Main entry point: loads configuration, wires the Home Assistant client and
//! the commit log into the API, and serves until Ctrl-C.

use anyhow::{Context, Result};
use ha_api::AppState;
use ha_client::HaClient;
use ha_config::AgentConfig;
use ha_git::GitManager;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Config file from the first argument, else `HA_AGENT_CONFIG`
fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HA_AGENT_CONFIG").map(PathBuf::from))
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}

#[tokio::main]
async fn main() -> Result<()> {
    let path = config_path();
    let config = AgentConfig::load(path.as_deref()).context("loading configuration")?;

    init_tracing(&config.log_level);
    config.validate()?;

    info!("Starting helper agent v{}", env!("CARGO_PKG_VERSION"));
    match path {
        Some(ref path) => info!("Configuration from {:?}", path),
        None => info!("No config file given, using defaults and environment"),
    }
    info!("Home Assistant at {}", config.home_assistant.url);
    if config.home_assistant.token.is_none() {
        warn!("No Home Assistant token configured, requests will be unauthenticated");
    }

    let ha = HaClient::new(
        &config.home_assistant.url,
        config.home_assistant.token.clone(),
        Duration::from_secs(config.home_assistant.timeout_secs),
    )
    .context("creating Home Assistant client")?;

    let git = GitManager::new(config.git.enabled, &config.git.repo_path).with_author(
        config.git.author_name.clone(),
        config.git.author_email.clone(),
    );
    if config.git.enabled {
        info!("Commit logging enabled in {:?}", git.repo_path());
    }

    let state = AppState::new(Arc::new(ha), Arc::new(git));

    ha_api::start_server(state, &config.server.bind_addr(), shutdown_signal())
        .await
        .context("running API server")?;

    info!("Stopped");
    Ok(())
}
