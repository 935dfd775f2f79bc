use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::debug;

use super::error::{EngineError, EngineResult};

/// Default chat model for answer synthesis.
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

#[async_trait]
/// Single-turn text completion.
pub trait LlmClient: Send + Sync {
    fn model(&self) -> &str;

    async fn complete(&self, prompt: &str) -> EngineResult<String>;
}

/// [`LlmClient`] over `genai`, which resolves the provider from the model name.
#[derive(Clone)]
pub struct GenaiLlm {
    client: Client,
    model: String,
}

impl GenaiLlm {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
        }
    }

    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl LlmClient for GenaiLlm {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> EngineResult<String> {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);

        let response = self
            .client
            .exec_chat(&self.model, request, None)
            .await
            .map_err(|e| EngineError::Llm {
                model: self.model.clone(),
                message: e.to_string(),
            })?;

        let text = response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| EngineError::Llm {
                model: self.model.clone(),
                message: "response contained no text".to_string(),
            })?;

        debug!(model = %self.model, chars = text.len(), "LLM completion received");
        Ok(text)
    }
}
