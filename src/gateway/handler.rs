use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use tracing::{info, instrument};

use super::STATUS_HEADER;
use super::error::GatewayError;
use super::payload::{ChatRequest, ChatResponse};
use super::state::HandlerState;

/// Parses a chat request body; empty, malformed and blank messages are rejected.
pub fn parse_chat_request(body: &[u8]) -> Result<ChatRequest, GatewayError> {
    if body.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "request body is empty".to_string(),
        ));
    }

    let request: ChatRequest = serde_json::from_slice(body)
        .map_err(|e| GatewayError::InvalidRequest(format!("invalid request schema: {}", e)))?;

    if request.message.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "message must not be empty".to_string(),
        ));
    }

    Ok(request)
}

#[instrument(skip(state, body), fields(request_id = tracing::field::Empty))]
pub async fn chat_handler(
    State(state): State<HandlerState>,
    body: Bytes,
) -> Result<Response, GatewayError> {
    let request = parse_chat_request(&body)?;

    let id = uuid::Uuid::new_v4().to_string();
    tracing::Span::current().record("request_id", tracing::field::display(&id));

    let reply = state.pipeline.respond(&request.message).await?;
    info!(route = %reply.route, sources = reply.sources.len(), "Chat reply sent");

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&reply.route.to_string()) {
        headers.insert(STATUS_HEADER, value);
    }

    Ok((headers, Json(ChatResponse::from_reply(id, reply))).into_response())
}
