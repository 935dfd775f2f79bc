//! Embedding providers.
//!
//! - [`EmbeddingProvider`] is the capability the classifier, indexer and query
//!   engine consume.
//! - [`OpenAiEmbeddings`] talks to OpenAI-compatible and Azure endpoints.
//! - [`StubEmbeddings`] produces deterministic vectors without a network.

/// Backend selection and settings.
pub mod config;
mod error;
/// HTTP embedding client.
pub mod openai;
mod provider;
/// Deterministic offline embedder.
pub mod stub;
/// Vector helpers (cosine, mean pooling, normalisation).
pub mod utils;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use config::{EmbeddingBackend, EmbeddingSettings};
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbeddingProvider;
pub use openai::OpenAiEmbeddings;
pub use provider::{Embedding, EmbeddingProvider};
pub use stub::StubEmbeddings;
pub use utils::{cosine_similarity, l2_normalize, mean_pool};

use std::sync::Arc;

use tracing::{info, warn};

/// Builds the provider selected by `settings`.
pub fn build_provider(
    settings: &EmbeddingSettings,
) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
    match settings.backend {
        EmbeddingBackend::Stub => {
            warn!("Embedding provider running in STUB mode (testing only)");
            Ok(Arc::new(StubEmbeddings::new(settings.dimensions)))
        }
        EmbeddingBackend::OpenAi | EmbeddingBackend::Azure => {
            let client = OpenAiEmbeddings::from_settings(settings)?;
            info!(
                backend = ?settings.backend,
                model = %settings.model,
                dimensions = settings.dimensions,
                "Embedding provider configured"
            );
            Ok(Arc::new(client))
        }
    }
}
