use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder,
};

use super::error::VectorDbError;
use super::model::{ChunkHit, ChunkPoint};

#[derive(Clone)]
/// Qdrant-backed document chunk index.
pub struct QdrantIndex {
    client: Qdrant,
    url: String,
}

impl QdrantIndex {
    /// Creates a client for `url`.
    pub fn new(url: &str) -> Result<Self, VectorDbError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| VectorDbError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn collection_error(name: &str, e: impl std::fmt::Display) -> VectorDbError {
        VectorDbError::CollectionFailed {
            collection: name.to_string(),
            message: e.to_string(),
        }
    }
}

/// Minimal async interface used by the indexer and the query engine.
pub trait VectorIndex: Send + Sync {
    /// Ensures a cosine-distance collection exists.
    fn ensure_collection(
        &self,
        name: &str,
        vector_size: u64,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Inserts or replaces chunks.
    fn upsert_chunks(
        &self,
        collection: &str,
        chunks: Vec<ChunkPoint>,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Returns the `limit` nearest chunks, best first.
    fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> impl std::future::Future<Output = Result<Vec<ChunkHit>, VectorDbError>> + Send;

    /// Drops a collection (no-op if missing).
    fn delete_collection(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;
}

impl VectorIndex for QdrantIndex {
    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        let exists = self
            .client
            .collection_exists(name)
            .await
            .map_err(|e| Self::collection_error(name, e))?;

        if !exists {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(name)
                        .vectors_config(VectorParamsBuilder::new(vector_size, Distance::Cosine))
                        .on_disk_payload(true),
                )
                .await
                .map_err(|e| Self::collection_error(name, e))?;
        }

        Ok(())
    }

    async fn upsert_chunks(
        &self,
        collection: &str,
        chunks: Vec<ChunkPoint>,
    ) -> Result<(), VectorDbError> {
        if chunks.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = chunks
            .into_iter()
            .map(|chunk| {
                let (id, vector, payload) = chunk.into_payload();
                PointStruct::new(id, vector, payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
            .await
            .map_err(|e| VectorDbError::UpsertFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<ChunkHit>, VectorDbError> {
        let response = self
            .client
            .search_points(SearchPointsBuilder::new(collection, query, limit).with_payload(true))
            .await
            .map_err(|e| VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: e.to_string(),
            })?;

        Ok(response
            .result
            .into_iter()
            .filter_map(ChunkHit::from_scored_point)
            .collect())
    }

    async fn delete_collection(&self, name: &str) -> Result<(), VectorDbError> {
        let exists = self
            .client
            .collection_exists(name)
            .await
            .map_err(|e| Self::collection_error(name, e))?;

        if exists {
            self.client
                .delete_collection(name)
                .await
                .map_err(|e| Self::collection_error(name, e))?;
        }
        Ok(())
    }
}
