use std::collections::HashMap;

use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::{ScoredPoint, Value};

/// Payload key holding the source file's base name.
pub const PAYLOAD_FILE_NAME: &str = "file_name";
/// Payload key holding the source file's path.
pub const PAYLOAD_FILE_PATH: &str = "file_path";
/// Payload key holding the chunk text.
pub const PAYLOAD_TEXT: &str = "text";
/// Payload key holding the chunk's position in its document.
pub const PAYLOAD_CHUNK_INDEX: &str = "chunk_index";
/// Payload key holding the ingestion timestamp (unix seconds).
pub const PAYLOAD_INGESTED_AT: &str = "ingested_at";

/// One embedded document chunk.
#[derive(Debug, Clone)]
pub struct ChunkPoint {
    pub id: u64,
    pub vector: Vec<f32>,
    pub file_name: String,
    pub file_path: String,
    pub text: String,
    pub chunk_index: u32,
    pub ingested_at: i64,
}

impl ChunkPoint {
    pub(crate) fn into_payload(self) -> (u64, Vec<f32>, HashMap<String, Value>) {
        let mut payload: HashMap<String, Value> = HashMap::new();
        payload.insert(PAYLOAD_FILE_NAME.to_string(), self.file_name.into());
        payload.insert(PAYLOAD_FILE_PATH.to_string(), self.file_path.into());
        payload.insert(PAYLOAD_TEXT.to_string(), self.text.into());
        payload.insert(
            PAYLOAD_CHUNK_INDEX.to_string(),
            i64::from(self.chunk_index).into(),
        );
        payload.insert(PAYLOAD_INGESTED_AT.to_string(), self.ingested_at.into());
        (self.id, self.vector, payload)
    }
}

/// One search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkHit {
    pub id: u64,
    pub score: f32,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub text: String,
}

impl ChunkHit {
    /// Converts a Qdrant hit; returns `None` for points without a numeric id.
    pub fn from_scored_point(point: ScoredPoint) -> Option<Self> {
        let id = match point.id.and_then(|pid| pid.point_id_options) {
            Some(PointIdOptions::Num(n)) => n,
            _ => return None,
        };

        let payload = point.payload;
        let string_field = |key: &str| payload.get(key).and_then(|v| v.as_str()).cloned();

        Some(Self {
            id,
            score: point.score,
            file_name: string_field(PAYLOAD_FILE_NAME),
            file_path: string_field(PAYLOAD_FILE_PATH),
            text: string_field(PAYLOAD_TEXT).unwrap_or_default(),
        })
    }
}
