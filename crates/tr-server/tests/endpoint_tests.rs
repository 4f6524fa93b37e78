//! Integration tests for the HTTP surface
//!
//! Drive the full axum app through `tower::ServiceExt::oneshot` with a mock
//! token fetcher, so no browser is involved.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::DateTime;
use tower::ServiceExt;

use tr_server::state::AppState;
use tr_server::{build_app, types::HealthResponse};
use tr_types::{
    AppError, AppResult, CapturedToken, LoginOutcome, LoginRequest, TokenFetcher, TokenSource,
};

enum MockBehavior {
    Success(&'static str),
    TokenNotFound,
    ElementTimeout,
}

struct MockFetcher {
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockFetcher {
    fn new(behavior: MockBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenFetcher for MockFetcher {
    async fn fetch_token(&self, _request: &LoginRequest) -> AppResult<LoginOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockBehavior::Success(token) => Ok(LoginOutcome {
                token: CapturedToken::new(*token, TokenSource::Network),
                elapsed: Duration::from_millis(4200),
            }),
            MockBehavior::TokenNotFound => Err(AppError::TokenNotFound),
            MockBehavior::ElementTimeout => Err(AppError::ElementTimeout {
                what: "element matching #Input_Email".to_string(),
                timeout_secs: 15,
            }),
        }
    }
}

fn app_with(fetcher: Arc<MockFetcher>) -> axum::Router {
    build_app(AppState::new(fetcher), true)
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/get-token")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_service_metadata() {
    let app = app_with(MockFetcher::new(MockBehavior::Success("t")));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health.status, "running");
    assert_eq!(health.service, "TokenRelay");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn missing_field_is_rejected_without_invoking_the_engine() {
    let fetcher = MockFetcher::new(MockBehavior::Success("t"));
    let app = app_with(fetcher.clone());

    let response = app
        .oneshot(post_json(r#"{"username":"user@example.com","url":"https://x"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "Missing required fields: username, password, url"
    );
    // No browser session must be created for invalid input.
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn empty_string_fields_count_as_missing() {
    let fetcher = MockFetcher::new(MockBehavior::Success("t"));
    let app = app_with(fetcher.clone());

    let response = app
        .oneshot(post_json(
            r#"{"username":"user","password":"","url":"https://x"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn successful_extraction_returns_token_payload() {
    let fetcher = MockFetcher::new(MockBehavior::Success("abc.def.ghi"));
    let app = app_with(fetcher.clone());

    let response = app
        .oneshot(post_json(
            r#"{"username":"user@example.com","password":"pw","url":"https://app.example.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["token"], "abc.def.ghi");
    assert_eq!(body["authorizationHeader"], "Bearer abc.def.ghi");
    assert_eq!(body["executionTime"], "4.20s");
    assert_eq!(fetcher.call_count(), 1);

    // expiresAt is exactly capturedAt + 55 minutes.
    let captured_at =
        DateTime::parse_from_rfc3339(body["capturedAt"].as_str().unwrap()).unwrap();
    let expires_at = DateTime::parse_from_rfc3339(body["expiresAt"].as_str().unwrap()).unwrap();
    assert_eq!(expires_at - captured_at, chrono::Duration::minutes(55));
}

#[tokio::test]
async fn token_not_found_maps_to_500() {
    let app = app_with(MockFetcher::new(MockBehavior::TokenNotFound));

    let response = app
        .oneshot(post_json(
            r#"{"username":"user","password":"pw","url":"https://app.example.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Token not found after login"));
}

#[tokio::test]
async fn element_timeout_maps_to_500_with_timeout_message() {
    let app = app_with(MockFetcher::new(MockBehavior::ElementTimeout));

    let response = app
        .oneshot(post_json(
            r#"{"username":"user","password":"pw","url":"https://app.example.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("Timed out"));
    // The submitted password never appears in error output.
    assert!(!message.contains("pw"));
}
