use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::error::EngineResult;
use super::llm::LlmClient;
use super::prompt::PromptTemplate;
use super::types::{QueryResponse, SourceNode};
use crate::constants::{DEFAULT_COLLECTION_NAME, DEFAULT_TOP_K};
use crate::embedding::EmbeddingProvider;
use crate::vectordb::VectorIndex;

#[async_trait]
/// Answers a question from the indexed documents.
pub trait QueryEngine: Send + Sync {
    async fn query(&self, text: &str) -> EngineResult<QueryResponse>;
}

/// Embed, search top-k, build context, prompt the LLM.
pub struct RetrievalQueryEngine<V: VectorIndex> {
    provider: Arc<dyn EmbeddingProvider>,
    index: Arc<V>,
    llm: Arc<dyn LlmClient>,
    collection: String,
    top_k: u64,
    template: PromptTemplate,
}

impl<V: VectorIndex> RetrievalQueryEngine<V> {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        index: Arc<V>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            provider,
            index,
            llm,
            collection: DEFAULT_COLLECTION_NAME.to_string(),
            top_k: DEFAULT_TOP_K,
            template: PromptTemplate::default(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_top_k(mut self, top_k: u64) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn top_k(&self) -> u64 {
        self.top_k
    }

    pub fn template(&self) -> PromptTemplate {
        self.template
    }
}

/// Joins retrieved chunks into a prompt context block.
pub fn build_context(nodes: &[SourceNode]) -> String {
    nodes
        .iter()
        .map(|node| match node.file_name() {
            Some(name) => format!("file_name: {}\n\n{}", name, node.text),
            None => node.text.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl<V: VectorIndex + 'static> QueryEngine for RetrievalQueryEngine<V> {
    async fn query(&self, text: &str) -> EngineResult<QueryResponse> {
        let query_vector = self.provider.embed(text).await?;

        let hits = self
            .index
            .search(&self.collection, query_vector, self.top_k)
            .await?;

        let source_nodes: Vec<SourceNode> = hits.into_iter().map(SourceNode::from).collect();
        debug!(
            collection = %self.collection,
            hits = source_nodes.len(),
            top_score = source_nodes.first().map(|n| n.score),
            "Retrieved context"
        );

        let prompt = self.template.render(&build_context(&source_nodes), text);
        let response_text = self.llm.complete(&prompt).await?;

        info!(
            model = self.llm.model(),
            sources = source_nodes.len(),
            "Query answered"
        );

        Ok(QueryResponse {
            response_text,
            source_nodes,
        })
    }
}
