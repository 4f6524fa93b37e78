//! Login flow engine for TokenRelay.
//!
//! Ties the finite-state machine, the two token-capture strategies, and the
//! browser session lifecycle together behind the
//! [`TokenFetcher`](tr_types::TokenFetcher) seam the HTTP layer consumes.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use tr_browser::{ChromiumPage, Session};
use tr_config::{ConfigManager, FlowSettings, SelectorSettings};
use tr_types::{
    AppError, AppResult, CapturedToken, LoginOutcome, LoginPage, LoginRequest, TokenFetcher,
    TokenSlot,
};

pub mod extract;
mod machine;

pub use extract::{extract_token, scan_storage};
pub use machine::{FlowStep, LoginFlow};

/// Run the state machine, then resolve the captured token: the network
/// slot first (preferred, lower latency), the storage scan as fallback.
///
/// Public so the whole flow can be exercised against a scripted fake page.
pub async fn run_to_token(
    page: &dyn LoginPage,
    slot: &TokenSlot,
    flow: &FlowSettings,
    selectors: &SelectorSettings,
    request: &LoginRequest,
) -> AppResult<CapturedToken> {
    LoginFlow::new(page, flow, selectors).run(request).await?;

    if let Some(token) = slot.get() {
        return Ok(token);
    }

    debug!("No network token observed, scanning browser storage");
    let dump = page.storage_dump().await?;
    scan_storage(&dump).ok_or(AppError::TokenNotFound)
}

/// The production engine: one browser session per call, closed
/// unconditionally on every exit path.
pub struct LoginFlowEngine {
    config: ConfigManager,
}

impl LoginFlowEngine {
    pub fn new(config: ConfigManager) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TokenFetcher for LoginFlowEngine {
    async fn fetch_token(&self, request: &LoginRequest) -> AppResult<LoginOutcome> {
        let target = Url::parse(&request.target_url)
            .map_err(|e| AppError::InvalidUrl(format!("{}: {}", request.target_url, e)))?;
        if !matches!(target.scheme(), "http" | "https") {
            return Err(AppError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                target.scheme()
            )));
        }

        let config = self.config.get();
        let started = Instant::now();

        info!("Starting login flow for {}", request.target_url);
        let session = Session::launch(&config.browser).await?;
        let page = ChromiumPage::new(
            session.page().clone(),
            config.flow.navigation_timeout(),
            config.flow.poll_interval(),
        );
        let slot = session.token_slot();

        let result = run_to_token(&page, &slot, &config.flow, &config.selectors, request).await;

        // Hygiene and teardown run on success and on error alike; cleanup
        // failures are swallowed inside and never mask `result`.
        session.cleanup().await;
        session.close().await;

        let token = result?;
        let elapsed = started.elapsed();
        info!(
            "Token captured via {:?} in {:.2}s",
            token.source,
            elapsed.as_secs_f64()
        );
        Ok(LoginOutcome { token, elapsed })
    }
}
