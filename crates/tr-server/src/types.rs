//! API request and response types for the token-extraction endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tr_types::{AppError, AppResult, LoginRequest};

/// Fixed token lifetime reported to callers. The real expiry is inside the
/// token; 55 minutes is a conservative heuristic so callers refresh before
/// the typical one-hour IdP lifetime runs out.
pub const TOKEN_TTL_MINUTES: i64 = 55;

/// `GET /` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    pub fn current() -> Self {
        Self {
            status: "running".to_string(),
            service: "TokenRelay".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// `POST /get-token` body. Fields are optional at the serde level so that
/// absence surfaces as our validation error, not a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetTokenRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl GetTokenRequest {
    /// Validate presence of all three fields. Empty strings count as
    /// missing, matching the original service's contract.
    pub fn validate(self) -> AppResult<LoginRequest> {
        match (
            non_empty(self.username),
            non_empty(self.password),
            non_empty(self.url),
        ) {
            (Some(username), Some(password), Some(target_url)) => Ok(LoginRequest {
                username,
                password,
                target_url,
            }),
            _ => Err(AppError::MissingFields),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Successful `POST /get-token` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
    pub authorization_header: String,
    pub expires_at: DateTime<Utc>,
    pub captured_at: DateTime<Utc>,
    pub execution_time: String,
}

impl TokenResponse {
    /// Build a success payload for a token captured now.
    pub fn new(token: String, elapsed: std::time::Duration) -> Self {
        let captured_at = Utc::now();
        Self {
            success: true,
            authorization_header: format!("Bearer {}", token),
            token,
            expires_at: captured_at + chrono::Duration::minutes(TOKEN_TTL_MINUTES),
            captured_at,
            execution_time: format!("{:.2}s", elapsed.as_secs_f64()),
        }
    }
}

/// Failure payload shared by 400 and 500 responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_complete_requests() {
        let body = GetTokenRequest {
            username: Some("user@example.com".into()),
            password: Some("pw".into()),
            url: Some("https://app.example.com".into()),
        };
        let request = body.validate().unwrap();
        assert_eq!(request.username, "user@example.com");
        assert_eq!(request.target_url, "https://app.example.com");
    }

    #[test]
    fn validate_rejects_absent_and_empty_fields() {
        let missing = GetTokenRequest {
            username: Some("user".into()),
            password: None,
            url: Some("https://app.example.com".into()),
        };
        assert!(matches!(
            missing.validate(),
            Err(AppError::MissingFields)
        ));

        let empty = GetTokenRequest {
            username: Some("user".into()),
            password: Some(String::new()),
            url: Some("https://app.example.com".into()),
        };
        assert!(matches!(empty.validate(), Err(AppError::MissingFields)));

        assert!(matches!(
            GetTokenRequest::default().validate(),
            Err(AppError::MissingFields)
        ));
    }

    #[test]
    fn token_response_expiry_is_55_minutes_after_capture() {
        let response = TokenResponse::new("abc".into(), std::time::Duration::from_secs(12));
        assert_eq!(
            response.expires_at - response.captured_at,
            chrono::Duration::minutes(55)
        );
        assert_eq!(response.authorization_header, "Bearer abc");
        assert!(response.success);
    }

    #[test]
    fn token_response_serializes_camel_case() {
        let response = TokenResponse::new("abc".into(), std::time::Duration::from_millis(1500));
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("authorizationHeader").is_some());
        assert!(json.get("expiresAt").is_some());
        assert!(json.get("capturedAt").is_some());
        assert_eq!(json.get("executionTime").unwrap(), "1.50s");
    }

    #[test]
    fn health_payload_reports_running() {
        let health = HealthResponse::current();
        assert_eq!(health.status, "running");
        assert_eq!(health.service, "TokenRelay");
        assert!(!health.version.is_empty());
    }
}
