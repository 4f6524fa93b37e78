//! OS-specific path resolution for configuration files

use std::path::PathBuf;

use tr_types::{AppError, AppResult};

/// Get the configuration directory
///
/// Priority:
/// 1. Runtime override via `TOKENRELAY_ENV` environment variable: `~/.tokenrelay-{env}/`
/// 2. Development mode (debug builds): `~/.tokenrelay-dev/`
/// 3. Production mode (release builds): `~/.tokenrelay/`
pub fn config_dir() -> AppResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AppError::Config("Could not determine home directory".to_string()))?;

    // Runtime override via environment variable (for testing)
    if let Ok(env_suffix) = std::env::var("TOKENRELAY_ENV") {
        return Ok(home.join(format!(".tokenrelay-{}", env_suffix)));
    }

    #[cfg(debug_assertions)]
    let dir = home.join(".tokenrelay-dev");

    #[cfg(not(debug_assertions))]
    let dir = home.join(".tokenrelay");

    Ok(dir)
}

/// Get the configuration file path
pub fn config_file() -> AppResult<PathBuf> {
    Ok(config_dir()?.join("settings.yaml"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir_exists(path: &PathBuf) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| {
            AppError::Config(format!(
                "Failed to create directory {}: {}",
                path.display(),
                e
            ))
        })?;
    }
    Ok(())
}
