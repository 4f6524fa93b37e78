//! Web server module
//!
//! Provides the TokenRelay HTTP API using Axum:
//! - `GET /` (and `/health`): service metadata
//! - `POST /get-token`: run a login flow, return the captured bearer token

pub mod middleware;
pub mod routes;
pub mod state;
pub mod types;

use std::net::SocketAddr;

use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info};

use self::state::AppState;

/// Request bodies are tiny (three string fields); 10 MiB matches the
/// original service's limit and is far beyond anything legitimate.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Web server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
        }
    }
}

/// Start the web server.
///
/// Binds the configured port, incrementing if it is taken, and serves until
/// the task is dropped. Returns the join handle and the actual port used.
pub async fn start_server(
    config: ServerConfig,
    state: AppState,
) -> anyhow::Result<(tokio::task::JoinHandle<()>, u16)> {
    info!("Starting web server on {}:{}", config.host, config.port);

    let app = build_app(state, config.enable_cors);

    let host_ip = config.host.parse::<std::net::IpAddr>()?;
    let mut port = config.port;
    let max_attempts = 100;

    let listener = loop {
        let addr = SocketAddr::from((host_ip, port));

        match TcpListener::bind(addr).await {
            Ok(listener) => {
                if port != config.port {
                    info!("Port {} was taken, using port {} instead", config.port, port);
                }
                break listener;
            }
            Err(e) => {
                if port - config.port >= max_attempts {
                    return Err(anyhow::anyhow!(
                        "Could not bind to any port between {} and {} (last error: {})",
                        config.port,
                        port,
                        e
                    ));
                }
                tracing::debug!("Port {} is taken, trying next port", port);
                port += 1;
            }
        }
    };

    info!("TokenRelay listening on http://{}:{}", config.host, port);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    Ok((handle, port))
}

/// Build the Axum app with all routes and middleware
pub fn build_app(state: AppState, enable_cors: bool) -> Router {
    let mut router = Router::new()
        .route("/", get(routes::health))
        .route("/health", get(routes::health))
        .route("/get-token", post(routes::get_token))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(logging_middleware));

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);

        router = router.layer(cors);
    }

    router
}

/// Logging middleware to log all requests
async fn logging_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(req).await;

    let elapsed = start.elapsed();
    let status = response.status();

    if status.is_success() {
        info!("{} {} - {} ({:?})", method, uri, status, elapsed);
    } else {
        error!("{} {} - {} ({:?})", method, uri, status, elapsed);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert!(config.enable_cors);
    }
}
