//! Axum HTTP server: router, listener, graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Path, Query, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get, post};
use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use uuidspot_core::{generate, generate_many, GenerateError, UuidVersion};

use crate::config::EdgeConfig;
use crate::relay;

/// Largest inbound body the relay will buffer before forwarding.
const MAX_RELAY_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: EdgeConfig,
    pub client: reqwest::Client,
}

/// Build and run the HTTP server.
pub async fn run(state: AppState) -> anyhow::Result<()> {
    let listen_addr = state.config.server.listen_address.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    tracing::info!(address = %listen_addr, "uuidspot-edge listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("uuidspot-edge shut down gracefully");
    Ok(())
}

/// Assemble the application router.
fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/api/uuid", get(handle_generate))
        .route("/api/uuid/bulk", post(handle_generate_bulk))
        .route("/gtf", any(handle_relay_root))
        .route("/gtf/{*path}", any(handle_relay))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Query parameters for single generation.
#[derive(Debug, Deserialize)]
struct GenerateParams {
    #[serde(default)]
    version: UuidVersion,
}

/// GET /api/uuid?version=v4 — generate a single identifier.
///
/// A missing or unrecognized version falls back to v4.
async fn handle_generate(Query(params): Query<GenerateParams>) -> Response {
    let uuid = generate(params.version);
    axum::Json(serde_json::json!({
        "version": params.version,
        "uuid": uuid,
    }))
    .into_response()
}

/// POST /api/uuid/bulk — generate a batch of identifiers.
///
/// Rejects the whole request before generating anything when `count` is
/// missing, not an integer, or outside [1, 500].
async fn handle_generate_bulk(axum::Json(payload): axum::Json<serde_json::Value>) -> Response {
    let count = match payload.get("count").and_then(|v| v.as_i64()) {
        Some(c) => c,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                axum::Json(serde_json::json!({
                    "error": "count must be an integer between 1 and 500"
                })),
            )
                .into_response();
        }
    };

    let version = payload
        .get("version")
        .and_then(|v| v.as_str())
        .map(UuidVersion::parse_lossy)
        .unwrap_or_default();

    match generate_many(count, version) {
        Ok(uuids) => axum::Json(serde_json::json!({
            "version": version,
            "uuids": uuids,
        }))
        .into_response(),
        Err(e @ GenerateError::InvalidCount { .. }) => (
            StatusCode::BAD_REQUEST,
            axum::Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// ANY /gtf — relay to the upstream origin root.
async fn handle_relay_root(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
) -> Response {
    relay_request(state, None, Some(peer), request).await
}

/// ANY /gtf/{*path} — relay the trailing path to the upstream.
async fn handle_relay(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
) -> Response {
    relay_request(state, Some(path), Some(peer), request).await
}

/// Buffer the inbound body and hand off to the relay.
async fn relay_request(
    state: Arc<AppState>,
    trailing: Option<String>,
    peer: Option<SocketAddr>,
    request: Request,
) -> Response {
    let method = request.method().clone();
    let path = trailing.map(|p| format!("/{p}")).unwrap_or_default();
    let query = request
        .uri()
        .query()
        .map(|q| format!("?{q}"))
        .unwrap_or_default();
    let url = format!("{}{path}{query}", state.config.analytics.upstream);

    let headers = request.headers().clone();
    let body = match axum::body::to_bytes(request.into_body(), MAX_RELAY_BODY_BYTES).await {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read request body");
            return (StatusCode::BAD_REQUEST, "failed to read request body").into_response();
        }
    };

    relay::forward(&state.client, method, &url, &headers, body, peer).await
}

/// Health check endpoint.
async fn handle_health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Wait for SIGINT (Ctrl+C) for graceful shutdown.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C signal handler");
    tracing::info!("Shutdown signal received, draining connections...");
}
