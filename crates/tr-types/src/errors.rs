//! Error types and conversions

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fixed wire message for request validation failures (maps to 400).
    #[error("Missing required fields: username, password, url")]
    MissingFields,

    #[error("Invalid target URL: {0}")]
    InvalidUrl(String),

    #[error("Browser launch error: {0}. Install Google Chrome or Chromium, or set the browser executable path in the configuration")]
    BrowserLaunch(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Timed out after {timeout_secs}s waiting for {what}")]
    ElementTimeout { what: String, timeout_secs: u64 },

    #[error("Navigation timed out: {0}")]
    NavigationTimeout(String),

    #[error("Token not found after login. Please verify credentials.")]
    TokenNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// True for failures caused by the caller's input rather than the flow.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::MissingFields | AppError::InvalidUrl(_))
    }
}

impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
