//! Qdrant vector database integration (document chunk index).

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;


pub use client::{QdrantIndex, VectorIndex};
pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockVectorIndex;
pub use model::{
    ChunkHit, ChunkPoint, PAYLOAD_CHUNK_INDEX, PAYLOAD_FILE_NAME, PAYLOAD_FILE_PATH,
    PAYLOAD_INGESTED_AT, PAYLOAD_TEXT,
};

/// Default Qdrant endpoint (gRPC port).
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
