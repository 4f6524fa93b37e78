//! Configuration storage - loading and saving the YAML settings file

use std::path::Path;

use tokio::fs;
use tracing::info;

use tr_types::{AppError, AppResult};

use crate::paths;
use crate::types::AppConfig;

/// Load configuration from a file.
///
/// If the file doesn't exist, writes and returns a default configuration so
/// operators have a template to edit.
pub async fn load_config(path: &Path) -> AppResult<AppConfig> {
    if let Some(parent) = path.parent() {
        paths::ensure_dir_exists(&parent.to_path_buf())?;
    }

    if !path.exists() {
        info!(
            "Configuration file not found at {:?}, creating default configuration",
            path
        );
        let default_config = AppConfig::default();
        save_config(&default_config, path).await?;
        return Ok(default_config);
    }

    let contents = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

    let config: AppConfig = serde_yaml::from_str(&contents)
        .map_err(|e| AppError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    info!("Configuration loaded successfully from {:?}", path);
    Ok(config)
}

/// Save configuration to a file as YAML.
pub async fn save_config(config: &AppConfig, path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        paths::ensure_dir_exists(&parent.to_path_buf())?;
    }

    let yaml = serde_yaml::to_string(config)
        .map_err(|e| AppError::Config(format!("Failed to serialize configuration: {}", e)))?;

    fs::write(path, yaml)
        .await
        .map_err(|e| AppError::Config(format!("Failed to write {}: {}", path.display(), e)))?;

    Ok(())
}
