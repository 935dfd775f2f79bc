use std::collections::BTreeMap;

use crate::vectordb::{ChunkHit, PAYLOAD_FILE_NAME, PAYLOAD_FILE_PATH};

/// Metadata key for the page a chunk came from (paged formats only).
pub const METADATA_PAGE_LABEL: &str = "page_label";

/// A retrieved chunk that contributed to an answer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceNode {
    pub text: String,
    pub score: f32,
    pub metadata: BTreeMap<String, String>,
}

impl SourceNode {
    pub fn new(text: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            score,
            metadata: BTreeMap::new(),
        }
    }

    /// Builder-style metadata insert.
    pub fn with_metadata(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn file_name(&self) -> Option<&str> {
        self.metadata.get(PAYLOAD_FILE_NAME).map(String::as_str)
    }

    pub fn file_path(&self) -> Option<&str> {
        self.metadata.get(PAYLOAD_FILE_PATH).map(String::as_str)
    }

    pub fn page_label(&self) -> Option<&str> {
        self.metadata.get(METADATA_PAGE_LABEL).map(String::as_str)
    }
}

impl From<ChunkHit> for SourceNode {
    fn from(hit: ChunkHit) -> Self {
        let mut metadata = BTreeMap::new();
        if let Some(name) = hit.file_name {
            metadata.insert(PAYLOAD_FILE_NAME.to_string(), name);
        }
        if let Some(path) = hit.file_path {
            metadata.insert(PAYLOAD_FILE_PATH.to_string(), path);
        }
        Self {
            text: hit.text,
            score: hit.score,
            metadata,
        }
    }
}

/// Generated answer plus the chunks it was grounded on (best first).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResponse {
    pub response_text: String,
    pub source_nodes: Vec<SourceNode>,
}

impl QueryResponse {
    pub fn new(response_text: impl Into<String>, source_nodes: Vec<SourceNode>) -> Self {
        Self {
            response_text: response_text.into(),
            source_nodes,
        }
    }
}
