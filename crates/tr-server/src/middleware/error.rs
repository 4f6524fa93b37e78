//! Error handling middleware mapping engine failures to HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use tr_types::AppError;

use crate::types::ErrorResponse;

/// Application error that can be converted to an HTTP response
pub struct ApiErrorResponse {
    pub status: StatusCode,
    pub error: ErrorResponse,
}

impl ApiErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error: ErrorResponse::new(message),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

/// Convert AppError to ApiErrorResponse.
///
/// Validation failures are the caller's fault (400); everything else
/// (launch failures, element/navigation timeouts, token not found, CDP
/// errors) surfaces as 500 with the underlying message only, never a
/// stack trace and never the submitted credentials.
impl From<AppError> for ApiErrorResponse {
    fn from(err: AppError) -> Self {
        if err.is_validation() {
            ApiErrorResponse::bad_request(err.to_string())
        } else {
            ApiErrorResponse::internal_error(err.to_string())
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiErrorResponse>;
