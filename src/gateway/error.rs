use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::STATUS_HEADER;
use crate::pipeline::PipelineError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("chat pipeline failed: {0}")]
    Pipeline(#[from] PipelineError),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, status_tag) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::Pipeline(_) => (StatusCode::BAD_GATEWAY, "pipeline_error"),
        };

        let mut headers = HeaderMap::new();
        headers.insert(STATUS_HEADER, HeaderValue::from_static(status_tag));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
