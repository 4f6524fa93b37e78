//! Browser session lifecycle.
//!
//! One [`Session`] per login request: its own browser process, one page,
//! its own token slot. Sessions are never shared or reused; the owner must
//! call [`Session::close`] on every exit path, and `Drop` aborts the
//! background tasks as a backstop.

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::DeleteCookiesParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use tr_config::BrowserSettings;
use tr_types::{AppError, AppResult, TokenSlot};

use crate::capture::attach_observer;
use crate::{cdp_err, find_browser};

/// Clears both storage areas of the current origin.
const STORAGE_CLEAR_JS: &str =
    "(() => { localStorage.clear(); sessionStorage.clear(); return true; })()";

/// An exclusively-owned headless browser session.
pub struct Session {
    browser: Browser,
    handler_task: JoinHandle<()>,
    observer_task: JoinHandle<()>,
    page: Page,
    slot: TokenSlot,
}

impl Session {
    /// Launch a browser, open one page with a realistic desktop user agent,
    /// and wire up request observation.
    ///
    /// The observer is attached before any navigation so early
    /// token-bearing requests cannot be missed.
    pub async fn launch(settings: &BrowserSettings) -> AppResult<Self> {
        let executable = find_browser(settings)?;
        info!("Launching browser: {}", executable.display());

        let mut builder = BrowserConfig::builder()
            .chrome_executable(executable)
            .window_size(settings.window_width, settings.window_height)
            .viewport(None)
            .args(vec![
                "--no-sandbox",
                "--disable-setuid-sandbox",
                "--disable-dev-shm-usage",
                "--disable-gpu",
                "--disable-application-cache",
                "--disk-cache-size=0",
                "--no-first-run",
                "--no-default-browser-check",
            ]);
        if !settings.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(AppError::BrowserLaunch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| AppError::BrowserLaunch(e.to_string()))?;
        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = browser.new_page("about:blank").await.map_err(cdp_err)?;
        page.set_user_agent(settings.user_agent.as_str())
            .await
            .map_err(cdp_err)?;

        let slot = TokenSlot::new();
        let observer_task = attach_observer(&page, slot.clone(), settings.block_resources).await?;

        Ok(Self {
            browser,
            handler_task,
            observer_task,
            page,
            slot,
        })
    }

    /// The session's page.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// A handle to the session's write-once token cell.
    pub fn token_slot(&self) -> TokenSlot {
        self.slot.clone()
    }

    /// Best-effort removal of authentication artifacts before teardown:
    /// all cookies, both storage areas, and any secondary pages opened
    /// during the flow. Failures are logged and swallowed; calling this
    /// more than once is harmless.
    pub async fn cleanup(&self) {
        match self.page.get_cookies().await {
            Ok(cookies) if !cookies.is_empty() => {
                let count = cookies.len();
                let params: Vec<DeleteCookiesParams> = cookies
                    .into_iter()
                    .map(|cookie| {
                        let mut p = DeleteCookiesParams::new(cookie.name);
                        p.domain = Some(cookie.domain);
                        p.path = Some(cookie.path);
                        p
                    })
                    .collect();
                match self.page.delete_cookies(params).await {
                    Ok(_) => debug!("Cleared {} cookies", count),
                    Err(e) => warn!("Cookie cleanup failed: {}", e),
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Cookie enumeration failed during cleanup: {}", e),
        }

        if let Err(e) = self.page.evaluate(STORAGE_CLEAR_JS).await {
            warn!("Storage cleanup failed: {}", e);
        }

        match self.browser.pages().await {
            Ok(pages) => {
                for page in pages {
                    if page.target_id() != self.page.target_id() {
                        if let Err(e) = page.close().await {
                            warn!("Failed to close secondary page: {}", e);
                        }
                    }
                }
            }
            Err(e) => warn!("Page enumeration failed during cleanup: {}", e),
        }
    }

    /// Close the browser process. Consumes the session; background tasks
    /// are stopped.
    pub async fn close(mut self) {
        self.observer_task.abort();
        if let Err(e) = self.browser.close().await {
            debug!("Browser close reported an error: {}", e);
        }
        // handler_task is aborted by Drop once the struct goes away.
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.observer_task.abort();
        self.handler_task.abort();
    }
}
