use std::path::PathBuf;

use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The embedding provider failed while computing a centroid or a message embedding.
    #[error("embedding provider error: {0}")]
    Provider(#[from] EmbeddingError),

    /// A persisted centroid could not be decoded or does not match its reference set.
    #[error("corrupt centroid cache at {path}: {reason}")]
    CacheCorrupt { path: PathBuf, reason: String },

    #[error("centroid cache I/O error: {0}")]
    Storage(#[from] std::io::Error),

    /// A predicate was called before its reference centroid was loaded.
    #[error("reference embeddings for '{label}' are not loaded")]
    NotLoaded { label: String },
}

pub type ClassifierResult<T> = Result<T, ClassifierError>;
