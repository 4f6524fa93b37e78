//! Core data model: login requests, captured tokens, and the
//! single-assignment token slot shared between the flow engine and the
//! network observer.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Credentials and target for one login automation run.
///
/// Fields are validated (present and non-empty) at the HTTP layer before
/// this struct is constructed.
#[derive(Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub target_url: String,
}

// Credentials must never leak into logs or error output, so Debug redacts
// everything except the target URL.
impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &"<redacted>")
            .field("password", &"<redacted>")
            .field("target_url", &self.target_url)
            .finish()
    }
}

/// Where a token was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSource {
    Network,
    LocalStorage,
    SessionStorage,
}

/// A bearer token observed during a session, with its discovery source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedToken {
    pub value: String,
    pub source: TokenSource,
}

impl CapturedToken {
    pub fn new(value: impl Into<String>, source: TokenSource) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }
}

/// Successful engine result. The HTTP layer derives the timestamps.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: CapturedToken,
    pub elapsed: Duration,
}

/// Write-once token cell shared between the request observer task and the
/// flow engine. First writer wins; later writes are no-ops.
#[derive(Clone, Default)]
pub struct TokenSlot {
    inner: Arc<OnceLock<CapturedToken>>,
}

impl TokenSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test-and-set. Returns true if this call stored the token, false if a
    /// token was already present (the stored value is left untouched).
    pub fn set(&self, token: CapturedToken) -> bool {
        self.inner.set(token).is_ok()
    }

    pub fn get(&self) -> Option<CapturedToken> {
        self.inner.get().cloned()
    }

    pub fn is_set(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// Snapshot of both browser storage areas, entries in natural enumeration
/// order. Deserialized from the JSON produced by the in-page dump script.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageDump {
    #[serde(default)]
    pub local: Vec<(String, String)>,
    #[serde(default)]
    pub session: Vec<(String, String)>,
}
