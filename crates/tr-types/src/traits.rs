//! Seam traits between the flow engine, the browser adapter, and the HTTP
//! layer. Kept here so the flow engine can be exercised against a scripted
//! fake page and the server against a mock fetcher.

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::token::{LoginOutcome, LoginRequest, StorageDump};

/// The page-level operations the login flow needs from a browser driver.
///
/// Selector arguments are ordered strategy lists: implementations try each
/// selector in turn and act on the first that matches, since exact markup
/// varies by deployment and product version.
#[async_trait]
pub trait LoginPage: Send + Sync {
    /// Navigate to a URL and wait for the DOM-content-loaded signal.
    async fn goto(&self, url: &str) -> AppResult<()>;

    /// Wait for the next navigation, bounded. Returns
    /// [`AppError::NavigationTimeout`](crate::AppError::NavigationTimeout)
    /// when the bound elapses; callers decide whether that is fatal.
    async fn wait_for_navigation(&self, timeout: Duration) -> AppResult<()>;

    /// Wait for any of the selectors to match, then click it. Timing out is
    /// an [`AppError::ElementTimeout`](crate::AppError::ElementTimeout).
    async fn click_first(&self, selectors: &[String], timeout: Duration) -> AppResult<()>;

    /// Optional-branch variant of [`click_first`](Self::click_first):
    /// returns `Ok(false)` instead of an error when nothing matched within
    /// the bound.
    async fn try_click_first(&self, selectors: &[String], timeout: Duration) -> AppResult<bool>;

    /// Wait for any of the selectors to match, then type `text` into it.
    async fn type_into_first(
        &self,
        selectors: &[String],
        text: &str,
        timeout: Duration,
    ) -> AppResult<()>;

    /// Single-shot presence probe, no waiting.
    async fn is_present(&self, selectors: &[String]) -> bool;

    /// Dump all localStorage and sessionStorage entries of the current
    /// origin, in natural enumeration order.
    async fn storage_dump(&self) -> AppResult<StorageDump>;
}

/// The operation the HTTP layer needs from the flow engine. Behind a trait
/// so endpoint tests can substitute a mock without a browser.
#[async_trait]
pub trait TokenFetcher: Send + Sync {
    async fn fetch_token(&self, request: &LoginRequest) -> AppResult<LoginOutcome>;
}
