//! Server state shared across handlers
//!
//! Deliberately small: the token fetcher is the only shared collaborator.
//! Each request owns its browser session end to end, so there is no
//! cross-request cache, queue, or lock here.

use std::sync::Arc;

use tr_types::TokenFetcher;

#[derive(Clone)]
pub struct AppState {
    /// The login flow engine (or a mock in tests).
    pub fetcher: Arc<dyn TokenFetcher>,
}

impl AppState {
    pub fn new(fetcher: Arc<dyn TokenFetcher>) -> Self {
        Self { fetcher }
    }
}
