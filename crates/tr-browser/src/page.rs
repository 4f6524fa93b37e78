//! [`LoginPage`] implementation over a chromiumoxide page.
//!
//! Element waits poll the DOM until a selector strategy matches or the
//! bound elapses; chromiumoxide has no built-in bounded selector wait.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use tokio::time::Instant;
use tracing::debug;

use tr_types::{AppError, AppResult, LoginPage, StorageDump};

use crate::cdp_err;

/// Serializes every localStorage and sessionStorage entry of the current
/// origin, in natural enumeration order.
const STORAGE_DUMP_JS: &str = r#"
(() => {
  const dump = (area) => {
    const entries = [];
    for (let i = 0; i < area.length; i++) {
      const key = area.key(i);
      entries.push([key, area.getItem(key)]);
    }
    return entries;
  };
  return JSON.stringify({ local: dump(localStorage), session: dump(sessionStorage) });
})()
"#;

/// A live page plus the wait parameters the flow uses against it.
pub struct ChromiumPage {
    page: Page,
    navigation_timeout: Duration,
    poll_interval: Duration,
}

impl ChromiumPage {
    pub fn new(page: Page, navigation_timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            page,
            navigation_timeout,
            poll_interval,
        }
    }

    /// Try each selector strategy in order; first match wins.
    async fn find_first(&self, selectors: &[String]) -> Option<Element> {
        for selector in selectors {
            if let Ok(element) = self.page.find_element(selector.as_str()).await {
                return Some(element);
            }
        }
        None
    }

    /// Poll until one of the selectors matches or the bound elapses.
    async fn wait_for_any(&self, selectors: &[String], timeout: Duration) -> AppResult<Element> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(element) = self.find_first(selectors).await {
                return Ok(element);
            }
            if Instant::now() >= deadline {
                return Err(AppError::ElementTimeout {
                    what: format!("element matching {}", selectors.join(" | ")),
                    timeout_secs: timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[async_trait]
impl LoginPage for ChromiumPage {
    async fn goto(&self, url: &str) -> AppResult<()> {
        tokio::time::timeout(self.navigation_timeout, self.page.goto(url))
            .await
            .map_err(|_| AppError::NavigationTimeout(url.to_string()))?
            .map_err(cdp_err)?;
        Ok(())
    }

    async fn wait_for_navigation(&self, timeout: Duration) -> AppResult<()> {
        tokio::time::timeout(timeout, self.page.wait_for_navigation())
            .await
            .map_err(|_| {
                AppError::NavigationTimeout(format!("no navigation within {}s", timeout.as_secs()))
            })?
            .map_err(cdp_err)?;
        Ok(())
    }

    async fn click_first(&self, selectors: &[String], timeout: Duration) -> AppResult<()> {
        let element = self.wait_for_any(selectors, timeout).await?;
        element.click().await.map_err(cdp_err)?;
        Ok(())
    }

    async fn try_click_first(&self, selectors: &[String], timeout: Duration) -> AppResult<bool> {
        match self.wait_for_any(selectors, timeout).await {
            Ok(element) => {
                element.click().await.map_err(cdp_err)?;
                Ok(true)
            }
            Err(AppError::ElementTimeout { .. }) => {
                debug!("Optional element not present: {}", selectors.join(" | "));
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn type_into_first(
        &self,
        selectors: &[String],
        text: &str,
        timeout: Duration,
    ) -> AppResult<()> {
        let element = self.wait_for_any(selectors, timeout).await?;
        element.click().await.map_err(cdp_err)?;
        element.type_str(text).await.map_err(cdp_err)?;
        Ok(())
    }

    async fn is_present(&self, selectors: &[String]) -> bool {
        self.find_first(selectors).await.is_some()
    }

    async fn storage_dump(&self) -> AppResult<StorageDump> {
        let result = self.page.evaluate(STORAGE_DUMP_JS).await.map_err(cdp_err)?;
        let json: String = result.into_value()?;
        Ok(serde_json::from_str(&json)?)
    }
}
