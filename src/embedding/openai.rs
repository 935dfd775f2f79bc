//! OpenAI-compatible `/embeddings` client (OpenAI, Azure OpenAI, and compatible servers).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::{EmbeddingBackend, EmbeddingSettings};
use super::error::EmbeddingError;
use super::provider::{Embedding, EmbeddingProvider};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Model family that honours the `dimensions` request parameter.
const SHORTENABLE_MODEL_PREFIX: &str = "text-embedding-3";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

enum Auth {
    Bearer(String),
    AzureKey(String),
}

/// HTTP embedding provider.
pub struct OpenAiEmbeddings {
    http: HttpClient,
    url: String,
    auth: Auth,
    model: String,
    send_model: bool,
    dimensions: usize,
    request_dimensions: Option<usize>,
}

impl std::fmt::Debug for OpenAiEmbeddings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbeddings")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

impl OpenAiEmbeddings {
    /// Builds a client from settings. Requires an API key.
    pub fn from_settings(settings: &EmbeddingSettings) -> Result<Self, EmbeddingError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| EmbeddingError::InvalidConfig {
                reason: "an API key is required for remote embedding backends".to_string(),
            })?;

        let base = settings.endpoint.trim_end_matches('/');
        let (url, auth, send_model) = match settings.backend {
            EmbeddingBackend::Azure => (
                format!(
                    "{}/openai/deployments/{}/embeddings?api-version={}",
                    base, settings.model, settings.azure_api_version
                ),
                Auth::AzureKey(api_key),
                false,
            ),
            EmbeddingBackend::OpenAi => {
                (format!("{}/embeddings", base), Auth::Bearer(api_key), true)
            }
            EmbeddingBackend::Stub => {
                return Err(EmbeddingError::InvalidConfig {
                    reason: "stub backend has no HTTP client".to_string(),
                });
            }
        };

        // Only the v3 OpenAI models accept a shortened output size; older models
        // and Azure deployments reject the parameter.
        let request_dimensions = (settings.backend == EmbeddingBackend::OpenAi
            && settings.model.starts_with(SHORTENABLE_MODEL_PREFIX))
        .then_some(settings.dimensions);

        Ok(Self {
            http: HttpClient::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| HttpClient::new()),
            url,
            auth,
            model: settings.model.clone(),
            send_model,
            dimensions: settings.dimensions,
            request_dimensions,
        })
    }

    /// Returns the full request URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let body = EmbeddingRequest {
            model: self.send_model.then_some(self.model.as_str()),
            input: texts,
            dimensions: self.request_dimensions,
        };

        let request = self.http.post(&self.url).json(&body);
        let request = match &self.auth {
            Auth::Bearer(key) => request.bearer_auth(key),
            Auth::AzureKey(key) => request.header("api-key", key),
        };

        debug!(count = texts.len(), model = %self.model, "Requesting embeddings");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let mut parsed: EmbeddingResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        if parsed.data.len() != texts.len() {
            return Err(EmbeddingError::MalformedResponse {
                reason: format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    parsed.data.len()
                ),
            });
        }

        parsed.data.sort_by_key(|d| d.index);

        parsed
            .data
            .into_iter()
            .map(|d| {
                if d.embedding.len() != self.dimensions {
                    Err(EmbeddingError::DimensionMismatch {
                        expected: self.dimensions,
                        actual: d.embedding.len(),
                    })
                } else {
                    Ok(d.embedding)
                }
            })
            .collect()
    }
}
