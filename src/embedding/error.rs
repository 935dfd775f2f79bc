use thiserror::Error;

/// Failures of the embedding provider (network, auth, malformed output).
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("embedding API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed embedding response: {reason}")]
    MalformedResponse { reason: String },

    #[error("cannot aggregate an empty list of texts")]
    EmptyInput,

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid embedding configuration: {reason}")]
    InvalidConfig { reason: String },
}
