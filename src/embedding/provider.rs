use async_trait::async_trait;

use super::error::EmbeddingError;
use super::utils::{cosine_similarity, mean_pool};

/// A dense text embedding.
pub type Embedding = Vec<f32>;

#[async_trait]
/// Maps text to vectors and compares vectors.
///
/// Only [`embed_batch`](EmbeddingProvider::embed_batch) and the identity
/// methods are required. Aggregation defaults to the component-wise mean and
/// similarity to cosine; providers with their own notion of either override
/// them, and callers never do vector math themselves.
pub trait EmbeddingProvider: Send + Sync {
    /// Identifies the vector space (model name plus anything that changes its output).
    fn model_id(&self) -> &str;

    /// Output dimension.
    fn dimensions(&self) -> usize;

    /// Embeds every text independently, preserving order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError>;

    /// Combines the embeddings of `texts` into a single vector.
    async fn aggregate_embed(&self, texts: &[String]) -> Result<Embedding, EmbeddingError> {
        if texts.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        let vectors = self.embed_batch(texts).await?;
        if vectors.len() != texts.len() {
            return Err(EmbeddingError::MalformedResponse {
                reason: format!(
                    "expected {} embeddings, provider returned {}",
                    texts.len(),
                    vectors.len()
                ),
            });
        }
        mean_pool(&vectors)
    }

    /// Embeds one text through the aggregation path.
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.aggregate_embed(&[text.to_string()]).await
    }

    /// Similarity score between two vectors.
    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        cosine_similarity(a, b)
    }
}
