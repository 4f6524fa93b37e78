//! Passive network token capture.
//!
//! Every request the session makes is paused at the CDP Fetch stage; the
//! `Authorization` header is inspected before the continue/abort decision so
//! no token-bearing request can be missed, including aborted ones.

use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EnableParams, EventRequestPaused, FailRequestParams, RequestPattern,
    RequestStage,
};
use chromiumoxide::cdp::browser_protocol::network::{ErrorReason, ResourceType};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use tr_types::{AppResult, CapturedToken, TokenSlot, TokenSource};

use crate::cdp_err;

/// Extract a bearer token from a CDP header map.
///
/// Header names are matched case-insensitively; only values carrying the
/// literal `"Bearer "` prefix count, and the prefix is stripped.
pub fn bearer_from_header_map(headers: &serde_json::Value) -> Option<String> {
    let map = headers.as_object()?;
    for (name, value) in map {
        if name.eq_ignore_ascii_case("authorization") {
            return value
                .as_str()
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(str::to_string);
        }
    }
    None
}

/// Resource types worth aborting when resource blocking is on. Documents,
/// scripts, and XHR/fetch traffic always pass through.
fn is_blockable(resource_type: &ResourceType) -> bool {
    matches!(
        resource_type,
        ResourceType::Image | ResourceType::Stylesheet | ResourceType::Font | ResourceType::Media
    )
}

/// Enable Fetch-stage request interception on the page and spawn the
/// observer task. Must be called before the first navigation.
///
/// The observer inspects headers for every paused request, test-and-sets
/// `slot` on the first `Authorization: Bearer` value it sees, and then
/// resumes (or, for blockable resource types when `block_resources` is set,
/// aborts) the request.
pub(crate) async fn attach_observer(
    page: &Page,
    slot: TokenSlot,
    block_resources: bool,
) -> AppResult<JoinHandle<()>> {
    let mut events = page
        .event_listener::<EventRequestPaused>()
        .await
        .map_err(cdp_err)?;

    page.execute(
        EnableParams::builder()
            .pattern(
                RequestPattern::builder()
                    .url_pattern("*")
                    .request_stage(RequestStage::Request)
                    .build(),
            )
            .build(),
    )
    .await
    .map_err(cdp_err)?;

    let page = page.clone();
    Ok(tokio::spawn(async move {
        while let Some(event) = events.next().await {
            // Header inspection runs before the continue/abort decision.
            if !slot.is_set() {
                if let Ok(headers) = serde_json::to_value(&event.request.headers) {
                    if let Some(token) = bearer_from_header_map(&headers) {
                        if slot.set(CapturedToken::new(token, TokenSource::Network)) {
                            info!("Token captured from network request");
                        }
                    }
                }
            }

            let request_id = event.request_id.clone();
            let result = if block_resources && is_blockable(&event.resource_type) {
                page.execute(FailRequestParams::new(request_id, ErrorReason::Aborted))
                    .await
                    .map(|_| ())
            } else {
                page.execute(ContinueRequestParams::new(request_id))
                    .await
                    .map(|_| ())
            };

            if let Err(e) = result {
                // The page may already be navigating away or closing; the
                // observer keeps running for the requests that remain.
                debug!("Request interception decision failed: {}", e);
            }
        }
    }))
}
