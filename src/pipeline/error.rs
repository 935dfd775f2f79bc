use thiserror::Error;

use crate::engine::EngineError;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The query engine could not produce an answer.
    #[error("query engine error: {0}")]
    Engine(#[from] EngineError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
