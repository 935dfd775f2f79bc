use std::collections::HashMap;

use crate::embedding::cosine_similarity;
use crate::vectordb::{ChunkHit, ChunkPoint, VectorDbError, VectorIndex};

#[derive(Default)]
/// In-memory [`VectorIndex`] with brute-force cosine search.
pub struct MockVectorIndex {
    collections: std::sync::RwLock<HashMap<String, MockCollection>>,
}

#[derive(Default, Clone)]
struct MockCollection {
    vector_size: u64,
    points: HashMap<u64, ChunkPoint>,
}

impl MockVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point_count(&self, collection: &str) -> Option<usize> {
        self.collections
            .read()
            .ok()?
            .get(collection)
            .map(|c| c.points.len())
    }

    pub fn has_collection(&self, collection: &str) -> bool {
        self.collections
            .read()
            .map(|c| c.contains_key(collection))
            .unwrap_or(false)
    }
}

impl VectorIndex for MockVectorIndex {
    async fn ensure_collection(&self, name: &str, vector_size: u64) -> Result<(), VectorDbError> {
        let mut collections =
            self.collections
                .write()
                .map_err(|_| VectorDbError::CollectionFailed {
                    collection: name.to_string(),
                    message: "lock poisoned".to_string(),
                })?;

        collections
            .entry(name.to_string())
            .or_insert(MockCollection {
                vector_size,
                points: HashMap::new(),
            });

        Ok(())
    }

    async fn upsert_chunks(
        &self,
        collection: &str,
        chunks: Vec<ChunkPoint>,
    ) -> Result<(), VectorDbError> {
        let mut collections =
            self.collections
                .write()
                .map_err(|_| VectorDbError::UpsertFailed {
                    collection: collection.to_string(),
                    message: "lock poisoned".to_string(),
                })?;

        let coll =
            collections
                .get_mut(collection)
                .ok_or_else(|| VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                })?;

        for chunk in chunks {
            if chunk.vector.len() as u64 != coll.vector_size {
                return Err(VectorDbError::InvalidDimension {
                    expected: coll.vector_size as usize,
                    actual: chunk.vector.len(),
                });
            }
            coll.points.insert(chunk.id, chunk);
        }

        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: Vec<f32>,
        limit: u64,
    ) -> Result<Vec<ChunkHit>, VectorDbError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| VectorDbError::SearchFailed {
                collection: collection.to_string(),
                message: "lock poisoned".to_string(),
            })?;

        let coll =
            collections
                .get(collection)
                .ok_or_else(|| VectorDbError::CollectionNotFound {
                    collection: collection.to_string(),
                })?;

        let mut results: Vec<ChunkHit> = coll
            .points
            .values()
            .map(|p| ChunkHit {
                id: p.id,
                score: cosine_similarity(&query, &p.vector),
                file_name: Some(p.file_name.clone()),
                file_path: Some(p.file_path.clone()),
                text: p.text.clone(),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        results.truncate(limit as usize);
        Ok(results)
    }

    async fn delete_collection(&self, name: &str) -> Result<(), VectorDbError> {
        let mut collections =
            self.collections
                .write()
                .map_err(|_| VectorDbError::CollectionFailed {
                    collection: name.to_string(),
                    message: "lock poisoned".to_string(),
                })?;
        collections.remove(name);
        Ok(())
    }
}
