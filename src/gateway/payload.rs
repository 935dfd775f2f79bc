use serde::{Deserialize, Serialize};

use crate::pipeline::{ChatReply, Route, SourceDocument};

#[derive(Deserialize, Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
}

/// A cited document as sent over the wire. Non-UTF-8 paths are rendered lossily.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatSource {
    pub name: String,
    pub path: Option<String>,
}

impl From<SourceDocument> for ChatSource {
    fn from(doc: SourceDocument) -> Self {
        Self {
            name: doc.name,
            path: doc.path.map(|p| p.to_string_lossy().into_owned()),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ChatResponse {
    pub id: String,
    pub route: Route,
    pub text: String,
    pub sources: Vec<ChatSource>,
}

impl ChatResponse {
    pub fn from_reply(id: String, reply: ChatReply) -> Self {
        Self {
            id,
            route: reply.route,
            text: reply.text,
            sources: reply.sources.into_iter().map(ChatSource::from).collect(),
        }
    }
}
