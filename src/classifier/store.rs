//! Durable centroid cache (one rkyv file per reference set).

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use rkyv::rancor::Error as RkyvError;
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::error::{ClassifierError, ClassifierResult};
use super::reference::ReferenceSet;
use crate::embedding::Embedding;
use crate::hashing::fingerprint_hex;

const CACHE_EXTENSION: &str = "rkyv";

const KEY_FINGERPRINT_BYTES: usize = 8;

/// On-disk record of one centroid.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct StoredCentroid {
    /// Label of the reference set.
    pub label: String,
    /// Fingerprint of the examples and model that produced the centroid.
    pub fingerprint: [u8; 32],
    /// Centroid components.
    pub values: Vec<f32>,
}

#[derive(Debug, Clone)]
/// Stores centroids under `dir`, keyed by label and example fingerprint.
pub struct CentroidStore {
    dir: PathBuf,
}

impl CentroidStore {
    /// Creates a store rooted at `dir` (created on first save).
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `set` in the vector space of `model_id`.
    ///
    /// Changing the examples or the model changes the path, so a stale entry is
    /// simply never read again.
    pub fn path_for(&self, set: &ReferenceSet, model_id: &str) -> PathBuf {
        let fingerprint = set.fingerprint(model_id);
        self.dir.join(format!(
            "{}.{}.{}",
            set.label,
            fingerprint_hex(&fingerprint, KEY_FINGERPRINT_BYTES),
            CACHE_EXTENSION
        ))
    }

    /// Loads the centroid for `set`.
    ///
    /// Returns `Ok(None)` when no entry exists and [`ClassifierError::CacheCorrupt`]
    /// when the entry exists but cannot be trusted.
    pub fn load(
        &self,
        set: &ReferenceSet,
        model_id: &str,
        expected_dim: Option<usize>,
    ) -> ClassifierResult<Option<Embedding>> {
        let path = self.path_for(set, model_id);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let corrupt = |reason: String| ClassifierError::CacheCorrupt {
            path: path.clone(),
            reason,
        };

        let mut aligned = AlignedVec::<16>::with_capacity(bytes.len());
        aligned.extend_from_slice(&bytes);

        let stored = rkyv::from_bytes::<StoredCentroid, RkyvError>(&aligned)
            .map_err(|e| corrupt(format!("decode failed: {}", e)))?;

        if stored.label != set.label {
            return Err(corrupt(format!(
                "label mismatch: expected '{}', found '{}'",
                set.label, stored.label
            )));
        }
        if stored.fingerprint != set.fingerprint(model_id) {
            return Err(corrupt("fingerprint mismatch".to_string()));
        }
        if stored.values.is_empty() {
            return Err(corrupt("empty centroid".to_string()));
        }
        if let Some(expected) = expected_dim
            && stored.values.len() != expected
        {
            return Err(corrupt(format!(
                "dimension mismatch: expected {}, found {}",
                expected,
                stored.values.len()
            )));
        }
        if stored.values.iter().any(|v| !v.is_finite()) {
            return Err(corrupt("non-finite component".to_string()));
        }

        Ok(Some(stored.values))
    }

    /// Persists the centroid for `set`, atomically replacing any previous entry.
    pub fn save(
        &self,
        set: &ReferenceSet,
        model_id: &str,
        centroid: &[f32],
    ) -> ClassifierResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let record = StoredCentroid {
            label: set.label.clone(),
            fingerprint: set.fingerprint(model_id),
            values: centroid.to_vec(),
        };
        let bytes = rkyv::to_bytes::<RkyvError>(&record)
            .map_err(|e| std::io::Error::other(format!("serialization failed: {}", e)))?;

        let final_path = self.path_for(set, model_id);

        // Unique temp file in the same directory, so the rename stays on one filesystem.
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(&bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(&final_path).map_err(|e| e.error)?;

        Ok(final_path)
    }

    /// Deletes the entry for `set`; returns `false` if there was none.
    pub fn remove(&self, set: &ReferenceSet, model_id: &str) -> ClassifierResult<bool> {
        match fs::remove_file(self.path_for(set, model_id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
