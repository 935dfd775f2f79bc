use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("query embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("retrieval failed: {0}")]
    VectorDb(#[from] VectorDbError),

    /// The language model call failed or returned no text.
    #[error("llm '{model}' failed: {message}")]
    Llm { model: String, message: String },
}

pub type EngineResult<T> = Result<T, EngineError>;
