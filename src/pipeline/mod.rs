//! Chat orchestration: greeting, general-info, clarification and answered routes.
//!
//! The classifier is advisory here. If a similarity check fails, the message is
//! treated as substantive (general-info check) or the answer is kept (failure check),
//! and the error is logged. Only query-engine errors reach the caller.

pub mod error;
pub mod sources;
pub mod types;


pub use error::{PipelineError, PipelineResult};
pub use sources::{annotate, find_file, list_documents};
pub use types::{ChatReply, Route, SourceDocument};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::classifier::IntentClassifier;
use crate::constants::{GREETINGS, MIN_QUERY_CHARS};
use crate::engine::{QueryEngine, SourceNode};

/// Reply to short greetings.
pub const GREETING_REPLY: &str = "Hi! What would you like to ask me about?";

/// Reply to messages too short to query.
pub const CLARIFICATION_REPLY: &str = "I'd be happy to assist with your query, but I'll need a bit more information to provide a precise response.\nCould you please provide additional details or clarify your request?";

/// Default topic named in the general-info reply.
pub const DEFAULT_SUBJECT: &str = "the indexed documents";

/// Default extensions listed in the general-info reply.
pub const DEFAULT_DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "md", "txt"];

/// True for short messages containing a greeting word.
pub fn is_greeting(message: &str) -> bool {
    let lower = message.to_lowercase();
    message.chars().count() < MIN_QUERY_CHARS && GREETINGS.iter().any(|g| lower.contains(g))
}

/// Distinct `file_name`s of `nodes`, first-seen order.
pub fn unique_file_names(nodes: &[SourceNode]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in nodes.iter().filter_map(SourceNode::file_name) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

pub struct ChatPipeline {
    classifier: Arc<IntentClassifier>,
    engine: Arc<dyn QueryEngine>,
    source_dir: PathBuf,
    document_extensions: Vec<String>,
    subject: String,
}

impl ChatPipeline {
    pub fn new<P: Into<PathBuf>>(
        classifier: Arc<IntentClassifier>,
        engine: Arc<dyn QueryEngine>,
        source_dir: P,
    ) -> Self {
        Self {
            classifier,
            engine,
            source_dir: source_dir.into(),
            document_extensions: DEFAULT_DOCUMENT_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            subject: DEFAULT_SUBJECT.to_string(),
        }
    }

    pub fn with_document_extensions(mut self, extensions: Vec<String>) -> Self {
        self.document_extensions = extensions;
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn classifier(&self) -> &Arc<IntentClassifier> {
        &self.classifier
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Produces the reply for one user message.
    pub async fn respond(&self, message: &str) -> PipelineResult<ChatReply> {
        if is_greeting(message) {
            debug!(route = %Route::Greeting, "Routed message");
            return Ok(ChatReply::canned(GREETING_REPLY, Route::Greeting));
        }

        let is_general = match self.classifier.is_general_info_query(message).await {
            Ok(general) => general,
            Err(e) => {
                warn!(error = %e, "General-info check failed, treating message as substantive");
                false
            }
        };
        if is_general {
            return Ok(self.general_info_reply());
        }

        if message.chars().count() < MIN_QUERY_CHARS {
            debug!(route = %Route::TooShort, "Routed message");
            return Ok(ChatReply::canned(CLARIFICATION_REPLY, Route::TooShort));
        }

        let response = self.engine.query(message).await?;

        let failed = match self
            .classifier
            .is_retrieval_failure(&response.response_text)
            .await
        {
            Ok(failed) => failed,
            Err(e) => {
                warn!(error = %e, "Retrieval-failure check failed, keeping answer");
                false
            }
        };
        if failed {
            info!(route = %Route::RetrievalFailed, "Routed message");
            return Ok(ChatReply {
                text: response.response_text,
                route: Route::RetrievalFailed,
                sources: Vec::new(),
            });
        }

        let sources: Vec<SourceDocument> = unique_file_names(&response.source_nodes)
            .into_iter()
            .map(|name| SourceDocument {
                path: find_file(&self.source_dir, &name),
                name,
            })
            .collect();

        let text = if sources.is_empty() {
            response.response_text
        } else {
            annotate(&response.response_text, &sources)
        };

        info!(route = %Route::Answered, sources = sources.len(), "Routed message");
        Ok(ChatReply {
            text,
            route: Route::Answered,
            sources,
        })
    }

    fn general_info_reply(&self) -> ChatReply {
        let sources = list_documents(&self.source_dir, &self.document_extensions);
        let preamble = format!(
            "I'm here to help answering about {}.\n\n\
             My cognitive abilities are limited to the information available in the source documents.\n\
             Attached to the response please find source documents.\n",
            self.subject
        );

        info!(route = %Route::GeneralInfo, documents = sources.len(), "Routed message");
        ChatReply {
            text: annotate(&preamble, &sources),
            route: Route::GeneralInfo,
            sources,
        }
    }
}
