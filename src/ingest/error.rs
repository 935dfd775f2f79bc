use std::path::PathBuf;

use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("source directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("embedding failed for {path}: {source}")]
    Embedding {
        path: PathBuf,
        #[source]
        source: EmbeddingError,
    },

    #[error(transparent)]
    VectorDb(#[from] VectorDbError),
}

pub type IngestResult<T> = Result<T, IngestError>;
