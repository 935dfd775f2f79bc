use std::str::FromStr;

use crate::constants::DEFAULT_EMBEDDING_DIM;

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";
/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
/// Default Azure OpenAI REST API version.
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-02-01";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Which embedding backend to talk to.
pub enum EmbeddingBackend {
    #[default]
    /// OpenAI or any OpenAI-compatible endpoint (Groq, Ollama, vLLM, ...).
    OpenAi,
    /// Azure OpenAI deployment.
    Azure,
    /// Deterministic offline vectors (testing only).
    Stub,
}

impl FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "open_ai" => Ok(Self::OpenAi),
            "azure" => Ok(Self::Azure),
            "stub" => Ok(Self::Stub),
            other => Err(format!("unknown embedding backend: {}", other)),
        }
    }
}

impl EmbeddingBackend {
    /// Returns `true` if the backend calls a remote API.
    pub fn is_remote(&self) -> bool {
        !matches!(self, Self::Stub)
    }
}

#[derive(Debug, Clone)]
/// Embedding provider settings.
pub struct EmbeddingSettings {
    /// Backend selection.
    pub backend: EmbeddingBackend,
    /// Base URL. For Azure, the resource endpoint (`https://<name>.openai.azure.com`).
    pub endpoint: String,
    /// API key (not needed for the stub backend).
    pub api_key: Option<String>,
    /// Model name, or deployment name for Azure.
    pub model: String,
    /// Output dimension.
    pub dimensions: usize,
    /// Azure REST API version.
    pub azure_api_version: String,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            endpoint: DEFAULT_OPENAI_ENDPOINT.to_string(),
            api_key: None,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            dimensions: DEFAULT_EMBEDDING_DIM,
            azure_api_version: DEFAULT_AZURE_API_VERSION.to_string(),
        }
    }
}

impl EmbeddingSettings {
    /// Settings for the offline stub backend.
    pub fn stub(dimensions: usize) -> Self {
        Self {
            backend: EmbeddingBackend::Stub,
            model: "stub".to_string(),
            dimensions,
            ..Default::default()
        }
    }
}
