//! Health and token-extraction endpoints

use axum::{extract::State, Json};
use tracing::{error, info};

use crate::middleware::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;
use crate::types::{GetTokenRequest, HealthResponse, TokenResponse};

/// GET /
/// Service health and version metadata.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::current())
}

/// POST /get-token
///
/// Runs one full login flow and returns the captured bearer token.
/// Validation happens before the engine is invoked, so a bad request never
/// costs a browser launch.
pub async fn get_token(
    State(state): State<AppState>,
    Json(body): Json<GetTokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let request = body.validate().map_err(ApiErrorResponse::from)?;

    info!("Token extraction requested for {}", request.target_url);

    let outcome = state.fetcher.fetch_token(&request).await.map_err(|e| {
        error!("Token extraction failed: {}", e);
        ApiErrorResponse::from(e)
    })?;

    Ok(Json(TokenResponse::new(
        outcome.token.value,
        outcome.elapsed,
    )))
}
