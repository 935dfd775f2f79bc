//! HTTP gateway (Axum): JSON transport for the chat pipeline.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::{ErrorResponse, GatewayError};
pub use handler::{chat_handler, parse_chat_request};
pub use payload::{ChatRequest, ChatResponse, ChatSource};
pub use state::HandlerState;

/// Response header carrying the route or readiness tag.
pub const STATUS_HEADER: &str = "X-Ragsense-Status";

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/readyz", get(ready_handler))
        .route("/v1/chat", post(chat_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub classifier: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static("healthy"));

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

/// 200 once both reference centroids are loaded, 503 before.
#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let loaded = state.pipeline.classifier().is_loaded();
    let (status_code, status, classifier) = if loaded {
        (StatusCode::OK, "ok", "loaded")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "pending", "unloaded")
    };

    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(status));

    (
        status_code,
        headers,
        Json(ReadyResponse { status, classifier }),
    )
        .into_response()
}
