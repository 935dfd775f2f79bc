use std::hash::{DefaultHasher, Hash, Hasher};

use async_trait::async_trait;
use tracing::debug;

use super::error::EmbeddingError;
use super::provider::{Embedding, EmbeddingProvider};
use super::utils::l2_normalize;

/// Deterministic offline embedder: a text always maps to the same unit vector.
///
/// Vectors carry no semantics; use for wiring tests and local runs without an API key.
#[derive(Debug, Clone)]
pub struct StubEmbeddings {
    dimensions: usize,
    model_id: String,
}

impl StubEmbeddings {
    /// Creates a stub embedder producing `dimensions`-sized vectors.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            model_id: format!("stub-{}", dimensions),
        }
    }

    fn embed_one(&self, text: &str) -> Embedding {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimensions);
        for _ in 0..self.dimensions {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        l2_normalize(&mut embedding);
        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbeddings {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        debug!(count = texts.len(), "Generating stub embeddings");
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}
