use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// How a message was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Greeting,
    GeneralInfo,
    TooShort,
    Answered,
    RetrievalFailed,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Route::Greeting => "greeting",
            Route::GeneralInfo => "general_info",
            Route::TooShort => "too_short",
            Route::Answered => "answered",
            Route::RetrievalFailed => "retrieval_failed",
        };
        f.write_str(name)
    }
}

/// A document referenced by a reply. `path` is `None` when the file is not
/// present under the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub name: String,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub text: String,
    pub route: Route,
    pub sources: Vec<SourceDocument>,
}

impl ChatReply {
    pub(crate) fn canned(text: &str, route: Route) -> Self {
        Self {
            text: text.to_string(),
            route,
            sources: Vec::new(),
        }
    }
}
