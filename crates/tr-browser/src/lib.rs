//! Browser driver adapter for TokenRelay.
//!
//! Wraps chromiumoxide behind two surfaces: [`Session`] owns the browser
//! process lifecycle (launch, request observation, hygiene, close) and
//! [`ChromiumPage`] implements the [`LoginPage`](tr_types::LoginPage) seam
//! the flow engine drives.

use std::path::PathBuf;

use chromiumoxide::error::CdpError;
use tracing::debug;

use tr_config::BrowserSettings;
use tr_types::{AppError, AppResult};

pub mod capture;
mod page;
mod session;

pub use capture::bearer_from_header_map;
pub use page::ChromiumPage;
pub use session::Session;

/// Fallback install locations probed when neither the configuration nor
/// `PATH` yields an executable.
const BROWSER_CANDIDATES: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
];

/// Names probed on `PATH`, in preference order.
const BROWSER_NAMES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

pub(crate) fn cdp_err(e: CdpError) -> AppError {
    AppError::Browser(e.to_string())
}

/// Resolve the Chrome/Chromium executable to launch.
///
/// An explicit path from the configuration (or the `TOKENRELAY_CHROME`
/// environment override folded into it) always wins; otherwise `PATH` is
/// searched, then the usual install locations.
pub fn find_browser(settings: &BrowserSettings) -> AppResult<PathBuf> {
    if let Some(path) = &settings.executable {
        return Ok(path.clone());
    }

    for name in BROWSER_NAMES {
        if let Ok(path) = which::which(name) {
            debug!("Found browser on PATH: {}", path.display());
            return Ok(path);
        }
    }

    for candidate in BROWSER_CANDIDATES {
        let path = PathBuf::from(candidate);
        if path.exists() {
            debug!("Found browser at {}", path.display());
            return Ok(path);
        }
    }

    Err(AppError::BrowserLaunch(
        "no Chrome/Chromium executable found".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_executable_wins_over_probing() {
        let settings = BrowserSettings {
            executable: Some(PathBuf::from("/opt/custom/chrome")),
            ..BrowserSettings::default()
        };
        let path = find_browser(&settings).unwrap();
        assert_eq!(path, PathBuf::from("/opt/custom/chrome"));
    }

    #[test]
    fn launch_error_carries_install_guidance() {
        let err = AppError::BrowserLaunch("no Chrome/Chromium executable found".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Install Google Chrome or Chromium"));
    }
}
