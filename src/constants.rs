//! Cross-cutting, shared constants.
//!
//! The classification thresholds are empirically chosen and fixed. Both are
//! applied with a strict `>` comparison, so a score exactly on the threshold
//! is *not* a member of the class.

/// Similarity above which a user message counts as a general/meta question.
pub const GENERAL_INFO_THRESHOLD: f32 = 0.71;

/// Similarity above which a generated answer counts as a retrieval failure.
pub const RETRIEVAL_FAILURE_THRESHOLD: f32 = 0.70;

/// Cache label of the general-question reference set.
pub const GENERAL_QUESTIONS_LABEL: &str = "general_embeds";

/// Cache label of the failure-phrase reference set.
pub const FAILURE_PHRASES_LABEL: &str = "fail_embed";

/// Canonical questions asking about the system itself rather than the documents' content.
pub const GENERAL_QUESTION_EXAMPLES: &[&str] = &[
    "What documents do you have?",
    "What service can you provide?",
    "Can you list the documents currently available?",
    "What types of service do you offer?",
    "What documents are stored in this system?",
    "Can you describe the services you provide?",
    "What are the available documents in your archive?",
    "What specific services can this system offer?",
    "What document collections do you have?",
    "What can you provide in terms of service?",
    "What files do you have",
    "List all the files",
    "Please list all the files you have",
    "What is your file database",
];

/// Phrases an LLM produces when the retrieved context did not cover the question.
pub const FAILURE_PHRASE_EXAMPLES: &[&str] = &[
    "the provided context does not include specific information",
    "not provided in the available documents",
    "context does not include specific information",
    "the context does not include specific information about",
];

/// Messages shorter than this (in chars) are greetings or too vague to query.
pub const MIN_QUERY_CHARS: usize = 10;

/// Words that mark a short message as a greeting.
pub const GREETINGS: &[&str] = &["hello", "hi", "greetings", "hey"];

/// Retrieved chunks per query.
pub const DEFAULT_TOP_K: u64 = 5;

/// Default embedding dimension (OpenAI `text-embedding-3-small`).
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Default Qdrant collection holding document chunks.
pub const DEFAULT_COLLECTION_NAME: &str = "ragsense_documents";
