//! Document discovery, chunking and indexing.
//!
//! Documents are read as UTF-8 text. Anything that fails to read (binary formats
//! included) is skipped with a warning rather than aborting the run.

pub mod chunking;
pub mod error;

#[cfg(test)]
mod tests;

pub use chunking::{ChunkingConfig, chunk_text};
pub use error::{IngestError, IngestResult};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::constants::DEFAULT_COLLECTION_NAME;
use crate::embedding::EmbeddingProvider;
use crate::hashing::chunk_point_id;
use crate::vectordb::{ChunkPoint, VectorIndex};

/// Chunks embedded per provider call.
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 32;

/// True if `path` has one of `extensions` (case-insensitive, no leading dot).
pub fn matches_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.as_ref().eq_ignore_ascii_case(ext))
        })
}

/// Recursively lists files under `dir` with a matching extension, sorted.
pub fn discover_documents<S: AsRef<str>>(
    dir: &Path,
    extensions: &[S],
) -> IngestResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::SourceNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| IngestError::Walk {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() && matches_extension(entry.path(), extensions) {
            found.push(entry.into_path());
        }
    }

    found.sort();
    Ok(found)
}

/// Outcome of one indexing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Documents that produced at least one chunk.
    pub files: usize,
    pub chunks: usize,
    /// Documents that were unreadable or empty.
    pub skipped: usize,
}

/// Embeds document chunks into a [`VectorIndex`] collection.
pub struct Indexer<V: VectorIndex> {
    provider: Arc<dyn EmbeddingProvider>,
    index: Arc<V>,
    collection: String,
    chunking: ChunkingConfig,
    batch_size: usize,
}

impl<V: VectorIndex> Indexer<V> {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, index: Arc<V>) -> Self {
        Self {
            provider,
            index,
            collection: DEFAULT_COLLECTION_NAME.to_string(),
            chunking: ChunkingConfig::default(),
            batch_size: DEFAULT_EMBED_BATCH_SIZE,
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_chunking(mut self, chunking: ChunkingConfig) -> Self {
        self.chunking = chunking;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Indexes every matching document under `dir`.
    pub async fn index_directory<S: AsRef<str>>(
        &self,
        dir: &Path,
        extensions: &[S],
    ) -> IngestResult<IngestReport> {
        let documents = discover_documents(dir, extensions)?;
        self.index
            .ensure_collection(&self.collection, self.provider.dimensions() as u64)
            .await?;

        let mut report = IngestReport::default();
        for path in &documents {
            let text = match tokio::fs::read_to_string(path).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable document");
                    report.skipped += 1;
                    continue;
                }
            };

            let chunks = chunk_text(
                &text,
                self.chunking.chunk_chars,
                self.chunking.overlap_chars,
            );
            if chunks.is_empty() {
                debug!(path = %path.display(), "Skipping empty document");
                report.skipped += 1;
                continue;
            }

            let count = self.index_document(path, chunks).await?;
            report.files += 1;
            report.chunks += count;
        }

        info!(
            dir = %dir.display(),
            collection = %self.collection,
            files = report.files,
            chunks = report.chunks,
            skipped = report.skipped,
            "Indexing complete"
        );
        Ok(report)
    }

    async fn index_document(&self, path: &Path, chunks: Vec<String>) -> IngestResult<usize> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_path = path.to_string_lossy().into_owned();
        let ingested_at = chrono::Utc::now().timestamp();

        let mut indexed = 0;
        for (batch_no, batch) in chunks.chunks(self.batch_size).enumerate() {
            let vectors = self
                .provider
                .embed_batch(batch)
                .await
                .map_err(|source| IngestError::Embedding {
                    path: path.to_path_buf(),
                    source,
                })?;

            let offset = batch_no * self.batch_size;
            let points: Vec<ChunkPoint> = batch
                .iter()
                .zip(vectors)
                .enumerate()
                .map(|(i, (text, vector))| ChunkPoint {
                    id: chunk_point_id(&file_path, offset + i),
                    vector,
                    file_name: file_name.clone(),
                    file_path: file_path.clone(),
                    text: text.clone(),
                    chunk_index: (offset + i) as u32,
                    ingested_at,
                })
                .collect();

            indexed += points.len();
            self.index.upsert_chunks(&self.collection, points).await?;
        }

        debug!(path = %file_path, chunks = indexed, "Document indexed");
        Ok(indexed)
    }
}
