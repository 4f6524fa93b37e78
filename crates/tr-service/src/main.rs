mod cli;

use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tr_config::{AppConfig, ConfigManager};
use tr_flow::LoginFlowEngine;
use tr_server::{start_server, state::AppState, ServerConfig};

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tr_service=info,tr_server=info,tr_flow=info,tr_browser=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TokenRelay...");

    let cli = Cli::parse();

    let config_manager = {
        let loaded = match &cli.config {
            Some(path) => ConfigManager::load_from_path(path.clone()).await,
            None => ConfigManager::load().await,
        };
        loaded.unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            let path = tr_config::paths::config_file()
                .unwrap_or_else(|_| std::path::PathBuf::from("settings.yaml"));
            ConfigManager::new(AppConfig::default(), path)
        })
    };
    info!("Configuration file: {}", config_manager.config_path().display());

    // CLI flags override the file and environment.
    let mut config = config_manager.get();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(chrome) = cli.chrome {
        config.browser.executable = Some(chrome);
    }
    config_manager.set(config.clone());

    let engine = Arc::new(LoginFlowEngine::new(config_manager.clone()));
    let state = AppState::new(engine);

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        enable_cors: config.server.enable_cors,
    };

    let (handle, _port) = start_server(server_config, state).await?;
    handle.await?;

    Ok(())
}
