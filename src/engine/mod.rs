//! Query engine: retrieval over the chunk index plus LLM answer synthesis.

pub mod error;
pub mod llm;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod prompt;
pub mod retrieval;
pub mod types;


pub use error::{EngineError, EngineResult};
pub use llm::{DEFAULT_LLM_MODEL, GenaiLlm, LlmClient};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockLlm, MockQueryEngine};
pub use prompt::PromptTemplate;
pub use retrieval::{QueryEngine, RetrievalQueryEngine, build_context};
pub use types::{METADATA_PAGE_LABEL, QueryResponse, SourceNode};
