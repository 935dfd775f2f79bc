use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{EngineError, EngineResult};
use super::llm::LlmClient;
use super::retrieval::QueryEngine;
use super::types::QueryResponse;

/// Query engine returning a scripted response.
#[derive(Default)]
pub struct MockQueryEngine {
    response: Mutex<QueryResponse>,
    queries: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl MockQueryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(response: QueryResponse) -> Self {
        let engine = Self::new();
        engine.set_response(response);
        engine
    }

    pub fn set_response(&self, response: QueryResponse) {
        *self.response.lock() = response;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every query text received, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl QueryEngine for MockQueryEngine {
    async fn query(&self, text: &str) -> EngineResult<QueryResponse> {
        self.queries.lock().push(text.to_string());
        if self.failing.load(Ordering::SeqCst) {
            return Err(EngineError::Llm {
                model: "mock-llm".to_string(),
                message: "mock engine unavailable".to_string(),
            });
        }
        Ok(self.response.lock().clone())
    }
}

/// LLM returning a fixed completion and recording prompts.
pub struct MockLlm {
    completion: String,
    prompts: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl MockLlm {
    pub fn new(completion: impl Into<String>) -> Self {
        Self {
            completion: completion.into(),
            prompts: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    fn model(&self) -> &str {
        "mock-llm"
    }

    async fn complete(&self, prompt: &str) -> EngineResult<String> {
        self.prompts.lock().push(prompt.to_string());
        if self.failing.load(Ordering::SeqCst) {
            return Err(EngineError::Llm {
                model: self.model().to_string(),
                message: "mock llm unavailable".to_string(),
            });
        }
        Ok(self.completion.clone())
    }
}
