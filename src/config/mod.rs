//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `RAGSENSE_*` environment variables.
//! The embedding API key also falls back to `OPENAI_API_KEY`.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{DEFAULT_COLLECTION_NAME, DEFAULT_TOP_K};
use crate::embedding::{EmbeddingBackend, EmbeddingSettings};
use crate::engine::{DEFAULT_LLM_MODEL, PromptTemplate};
use crate::pipeline::{DEFAULT_DOCUMENT_EXTENSIONS, DEFAULT_SUBJECT};
use crate::vectordb::DEFAULT_QDRANT_URL;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RAGSENSE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory for persisted reference centroids. Default: `./.data/embeddings`.
    pub cache_dir: PathBuf,

    /// Directory holding the source documents. Default: `./data/source`.
    pub source_dir: PathBuf,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Qdrant collection for document chunks.
    pub collection_name: String,

    pub embedding: EmbeddingSettings,

    /// Chat model used for answer synthesis (any `genai` model name).
    pub llm_model: String,

    /// Chunks retrieved per query. Default: `5`.
    pub top_k: u64,

    /// Extensions (no dot, lowercase) treated as source documents.
    pub document_extensions: Vec<String>,

    /// Topic named in the general-info reply.
    pub subject: String,

    pub prompt_template: PromptTemplate,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            cache_dir: PathBuf::from("./.data/embeddings"),
            source_dir: PathBuf::from("./data/source"),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            embedding: EmbeddingSettings::default(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            top_k: DEFAULT_TOP_K,
            document_extensions: DEFAULT_DOCUMENT_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            subject: DEFAULT_SUBJECT.to_string(),
            prompt_template: PromptTemplate::default(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "RAGSENSE_PORT";
    const ENV_BIND_ADDR: &'static str = "RAGSENSE_BIND_ADDR";
    const ENV_CACHE_DIR: &'static str = "RAGSENSE_CACHE_DIR";
    const ENV_SOURCE_DIR: &'static str = "RAGSENSE_SOURCE_DIR";
    const ENV_QDRANT_URL: &'static str = "RAGSENSE_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "RAGSENSE_COLLECTION";
    const ENV_EMBEDDING_BACKEND: &'static str = "RAGSENSE_EMBEDDING_BACKEND";
    const ENV_EMBEDDING_ENDPOINT: &'static str = "RAGSENSE_EMBEDDING_ENDPOINT";
    const ENV_EMBEDDING_API_KEY: &'static str = "RAGSENSE_EMBEDDING_API_KEY";
    const ENV_OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    const ENV_EMBEDDING_MODEL: &'static str = "RAGSENSE_EMBEDDING_MODEL";
    const ENV_EMBEDDING_DIM: &'static str = "RAGSENSE_EMBEDDING_DIM";
    const ENV_AZURE_API_VERSION: &'static str = "RAGSENSE_AZURE_API_VERSION";
    const ENV_LLM_MODEL: &'static str = "RAGSENSE_LLM_MODEL";
    const ENV_TOP_K: &'static str = "RAGSENSE_TOP_K";
    const ENV_DOCUMENT_EXTENSIONS: &'static str = "RAGSENSE_DOCUMENT_EXTENSIONS";
    const ENV_SUBJECT: &'static str = "RAGSENSE_SUBJECT";
    const ENV_PROMPT_TEMPLATE: &'static str = "RAGSENSE_PROMPT_TEMPLATE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let cache_dir = Self::parse_path_from_env(Self::ENV_CACHE_DIR, defaults.cache_dir);
        let source_dir = Self::parse_path_from_env(Self::ENV_SOURCE_DIR, defaults.source_dir);
        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let collection_name =
            Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection_name);
        let embedding = Self::parse_embedding_from_env(defaults.embedding)?;
        let llm_model = Self::parse_string_from_env(Self::ENV_LLM_MODEL, defaults.llm_model);
        let top_k = Self::parse_from_env(Self::ENV_TOP_K, defaults.top_k)?;
        let document_extensions = match Self::non_empty_var(Self::ENV_DOCUMENT_EXTENSIONS) {
            Some(value) => parse_extensions(&value),
            None => defaults.document_extensions,
        };
        let subject = Self::parse_string_from_env(Self::ENV_SUBJECT, defaults.subject);
        let prompt_template =
            Self::parse_from_env(Self::ENV_PROMPT_TEMPLATE, defaults.prompt_template)?;

        Ok(Self {
            port,
            bind_addr,
            cache_dir,
            source_dir,
            qdrant_url,
            collection_name,
            embedding,
            llm_model,
            top_k,
            document_extensions,
            subject,
            prompt_template,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort {
                value: self.port.to_string(),
            });
        }

        if self.cache_dir.exists() && !self.cache_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.cache_dir.clone(),
            });
        }

        if !self.source_dir.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.source_dir.clone(),
            });
        }
        if !self.source_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.source_dir.clone(),
            });
        }

        if self.top_k == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_TOP_K,
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.embedding.dimensions == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_EMBEDDING_DIM,
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.document_extensions.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_DOCUMENT_EXTENSIONS,
                value: String::new(),
                reason: "at least one extension is required".to_string(),
            });
        }

        if self.embedding.backend.is_remote() && self.embedding.api_key.is_none() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_EMBEDDING_API_KEY,
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_embedding_from_env(
        defaults: EmbeddingSettings,
    ) -> Result<EmbeddingSettings, ConfigError> {
        let backend: EmbeddingBackend =
            Self::parse_from_env(Self::ENV_EMBEDDING_BACKEND, defaults.backend)?;

        let api_key = Self::non_empty_var(Self::ENV_EMBEDDING_API_KEY)
            .or_else(|| Self::non_empty_var(Self::ENV_OPENAI_API_KEY));

        Ok(EmbeddingSettings {
            backend,
            endpoint: Self::parse_string_from_env(Self::ENV_EMBEDDING_ENDPOINT, defaults.endpoint),
            api_key,
            model: Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, defaults.model),
            dimensions: Self::parse_from_env(Self::ENV_EMBEDDING_DIM, defaults.dimensions)?,
            azure_api_version: Self::parse_string_from_env(
                Self::ENV_AZURE_API_VERSION,
                defaults.azure_api_version,
            ),
        })
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match Self::non_empty_var(Self::ENV_PORT) {
            Some(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            None => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match Self::non_empty_var(Self::ENV_BIND_ADDR) {
            Some(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            None => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        Self::non_empty_var(var_name)
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::non_empty_var(var_name).unwrap_or(default)
    }

    fn parse_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match Self::non_empty_var(var_name) {
            Some(value) => value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
                name: var_name,
                reason: e.to_string(),
                value,
            }),
            None => Ok(default),
        }
    }

    fn non_empty_var(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Parses `"pdf, .MD,txt"` into `["pdf", "md", "txt"]`.
pub fn parse_extensions(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}
