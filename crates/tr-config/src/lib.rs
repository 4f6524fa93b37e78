//! Configuration management module
//!
//! Handles loading, saving, and managing the TokenRelay configuration:
//! HTTP listener settings, browser launch settings, flow timeouts, and the
//! per-field selector strategy lists.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use tr_types::AppResult;

pub mod paths;
mod storage;
pub mod types;

pub use storage::{load_config, save_config};
pub use types::*;

/// Environment variable overriding the listening port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable overriding the browser executable path.
pub const CHROME_ENV: &str = "TOKENRELAY_CHROME";

/// Thread-safe configuration manager.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new configuration manager
    pub fn new(config: AppConfig, config_path: PathBuf) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
        }
    }

    /// Load configuration from the default location, applying environment
    /// overrides on top of the file contents.
    pub async fn load() -> AppResult<Self> {
        let config_path = paths::config_file()?;
        let mut config = load_config(&config_path).await?;
        apply_env_overrides(&mut config);
        Ok(Self::new(config, config_path))
    }

    /// Load configuration with custom path
    pub async fn load_from_path(path: PathBuf) -> AppResult<Self> {
        let mut config = load_config(&path).await?;
        apply_env_overrides(&mut config);
        Ok(Self::new(config, path))
    }

    /// Get a snapshot of the current configuration
    pub fn get(&self) -> AppConfig {
        self.config.read().clone()
    }

    /// Replace the in-memory configuration (CLI overrides are applied this
    /// way after load).
    pub fn set(&self, config: AppConfig) {
        *self.config.write() = config;
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }
}

/// Apply environment-variable overrides: `PORT` for the listener and
/// `TOKENRELAY_CHROME` for the browser executable.
pub fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(port) = std::env::var(PORT_ENV) {
        match port.parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!("Ignoring invalid {} value: {}", PORT_ENV, port),
        }
    }

    if let Ok(path) = std::env::var(CHROME_ENV) {
        if !path.is_empty() {
            config.browser.executable = Some(PathBuf::from(path));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn port_env_overrides_config() {
        env::set_var(PORT_ENV, "8123");
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config);
        assert_eq!(config.server.port, 8123);
        env::remove_var(PORT_ENV);
    }

    #[test]
    #[serial]
    fn invalid_port_env_is_ignored() {
        env::set_var(PORT_ENV, "not-a-port");
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config);
        assert_eq!(config.server.port, 3000);
        env::remove_var(PORT_ENV);
    }

    #[test]
    #[serial]
    fn chrome_env_overrides_executable() {
        env::set_var(CHROME_ENV, "/usr/bin/google-chrome-stable");
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config);
        assert_eq!(
            config.browser.executable,
            Some(PathBuf::from("/usr/bin/google-chrome-stable"))
        );
        env::remove_var(CHROME_ENV);
    }

    #[test]
    #[serial]
    fn no_env_leaves_defaults() {
        env::remove_var(PORT_ENV);
        env::remove_var(CHROME_ENV);
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn manager_get_returns_snapshot() {
        let manager = ConfigManager::new(AppConfig::default(), PathBuf::from("/tmp/settings.yaml"));
        let mut snapshot = manager.get();
        snapshot.server.port = 9999;
        // Mutating the snapshot does not touch the shared config.
        assert_eq!(manager.get().server.port, 3000);

        manager.set(snapshot);
        assert_eq!(manager.get().server.port, 9999);
    }
}
