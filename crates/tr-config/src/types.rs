use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
///
/// Stored as YAML in the settings file; every section and field has a
/// default so a partial (or absent) file is always valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub browser: BrowserSettings,
    pub flow: FlowSettings,
    pub selectors: SelectorSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
        }
    }
}

/// Browser launch settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BrowserSettings {
    /// Explicit Chrome/Chromium executable. When unset, the adapter probes
    /// the usual install locations.
    pub executable: Option<PathBuf>,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    /// Realistic desktop user agent; some identity providers serve a
    /// degraded flow to obvious headless agents.
    pub user_agent: String,
    /// Abort image/stylesheet/font/media requests to cut page-load latency.
    /// Header inspection always runs before the abort decision.
    pub block_resources: bool,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
            window_width: 1920,
            window_height: 1080,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            block_resources: true,
        }
    }
}

/// Timeouts and settle delays for the login flow.
///
/// The settle delays are empirical: there is no DOM signal that a token has
/// been persisted, so the values that work depend on the deployment. They
/// are configuration, not constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlowSettings {
    pub navigation_timeout_secs: u64,
    pub element_timeout_secs: u64,
    /// Bound for the optional intermediate "Log in" button; expiring this
    /// wait is a branch, not a failure.
    pub initial_button_timeout_secs: u64,
    pub redirect_timeout_secs: u64,
    /// Bound for the post-submit navigation; expiring this wait means
    /// "assume already authenticated".
    pub auth_timeout_secs: u64,
    /// Pause after advancing from the email page to the password page.
    pub advance_settle_ms: u64,
    /// Grace period after authentication for token-bearing requests and
    /// storage writes to complete.
    pub settle_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            navigation_timeout_secs: 30,
            element_timeout_secs: 15,
            initial_button_timeout_secs: 15,
            redirect_timeout_secs: 30,
            auth_timeout_secs: 30,
            advance_settle_ms: 1500,
            settle_ms: 5000,
            poll_interval_ms: 250,
        }
    }
}

impl FlowSettings {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_secs)
    }

    pub fn initial_button_timeout(&self) -> Duration {
        Duration::from_secs(self.initial_button_timeout_secs)
    }

    pub fn redirect_timeout(&self) -> Duration {
        Duration::from_secs(self.redirect_timeout_secs)
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_secs)
    }

    pub fn advance_settle(&self) -> Duration {
        Duration::from_millis(self.advance_settle_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Ordered selector strategies per login-form field.
///
/// Exact markup varies by deployment and product version, so each field
/// carries a list tried in order rather than one fragile selector. Defaults
/// match the identity-provider UI this service was built against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectorSettings {
    /// The intermediate "Log in" affordance some deployments show before
    /// redirecting to the identity provider.
    pub initial_login: Vec<String>,
    pub email: Vec<String>,
    pub password: Vec<String>,
    pub submit: Vec<String>,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            initial_login: vec!["#loginButton".to_string()],
            email: vec![
                "#Input_Email".to_string(),
                "input[type='email']".to_string(),
                "input[name='Input.Email']".to_string(),
                "input[placeholder*='mail' i]".to_string(),
            ],
            password: vec![
                "#Input_Password".to_string(),
                "input[type='password']".to_string(),
            ],
            submit: vec![
                "button[type='submit'].btn.btn-primary".to_string(),
                "button[type='submit']".to_string(),
            ],
        }
    }
}
