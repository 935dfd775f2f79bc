//! ragsense library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Core
//! - [`IntentClassifier`]: general-info and retrieval-failure routing by
//!   embedding similarity against cached reference centroids
//! - [`ChatPipeline`], [`ChatReply`], [`Route`]: per-message orchestration
//! - [`Config`], [`ConfigError`]: server configuration
//!
//! ## Capabilities
//! - [`EmbeddingProvider`] with [`OpenAiEmbeddings`] and [`StubEmbeddings`]
//! - [`QueryEngine`] with [`RetrievalQueryEngine`] over a [`VectorIndex`]
//! - [`Indexer`]: document chunking and ingestion
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod engine;
pub mod gateway;
pub mod hashing;
pub mod ingest;
pub mod pipeline;
pub mod vectordb;

pub use classifier::{
    CentroidStore, ClassificationThreshold, ClassifierError, ClassifierResult, IntentClassifier,
    ReferenceSet,
};
pub use config::{Config, ConfigError};
pub use constants::{GENERAL_INFO_THRESHOLD, RETRIEVAL_FAILURE_THRESHOLD};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbeddingProvider;
pub use embedding::{
    Embedding, EmbeddingBackend, EmbeddingError, EmbeddingProvider, EmbeddingSettings,
    OpenAiEmbeddings, StubEmbeddings, build_provider,
};
#[cfg(any(test, feature = "mock"))]
pub use engine::{MockLlm, MockQueryEngine};
pub use engine::{
    EngineError, GenaiLlm, LlmClient, PromptTemplate, QueryEngine, QueryResponse,
    RetrievalQueryEngine, SourceNode,
};
pub use gateway::{GatewayError, HandlerState, create_router_with_state};
pub use hashing::{chunk_point_id, fingerprint_examples, hash_to_u64};
pub use ingest::{IngestError, IngestReport, Indexer, chunk_text, discover_documents};
pub use pipeline::{
    ChatPipeline, ChatReply, PipelineError, Route, SourceDocument, find_file, list_documents,
};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorIndex;
pub use vectordb::{ChunkHit, ChunkPoint, QdrantIndex, VectorDbError, VectorIndex};
