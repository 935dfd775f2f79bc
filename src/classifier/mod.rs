//! Intent & retrieval-failure classification by embedding similarity.
//!
//! Two reference sets, "general questions" and "failure phrases", are each reduced
//! to one centroid by the embedding provider's aggregation. A message (or a generated
//! answer) is embedded through the same aggregation path and compared against the
//! relevant centroid; membership is `similarity > threshold`.
//!
//! # Centroid lifecycle
//!
//! Each centroid goes `UNLOADED -> LOADED` once per process:
//!
//! 1. already in memory: nothing to do
//! 2. a valid entry in the [`CentroidStore`]: deserialize it
//! 3. otherwise: aggregate the examples, keep the result, persist it
//!
//! The load is guarded by a [`tokio::sync::OnceCell`], so concurrent first callers
//! trigger at most one computation per set. A failed computation leaves the set
//! unloaded and the next call retries. Corrupt or stale cache entries are treated as
//! misses and overwritten.
//!
//! # Preconditions
//!
//! [`IntentClassifier::is_general_info_query`] and
//! [`IntentClassifier::is_retrieval_failure`] never load centroids themselves. Calling
//! either before [`IntentClassifier::ensure_reference_embeddings_loaded`] succeeded
//! returns [`ClassifierError::NotLoaded`].

pub mod error;
pub mod reference;
pub mod store;


pub use error::{ClassifierError, ClassifierResult};
pub use reference::{ClassificationThreshold, ReferenceSet};
pub use store::{CentroidStore, StoredCentroid};

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::embedding::{Embedding, EmbeddingError, EmbeddingProvider};

struct ReferenceSlot {
    set: ReferenceSet,
    threshold: ClassificationThreshold,
    centroid: OnceCell<Embedding>,
}

impl ReferenceSlot {
    fn new(set: ReferenceSet, threshold: ClassificationThreshold) -> Self {
        Self {
            set,
            threshold,
            centroid: OnceCell::new(),
        }
    }
}

/// Owns both reference centroids and answers the two routing predicates.
pub struct IntentClassifier {
    provider: Arc<dyn EmbeddingProvider>,
    store: CentroidStore,
    general: ReferenceSlot,
    failure: ReferenceSlot,
}

impl std::fmt::Debug for IntentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentClassifier")
            .field("model_id", &self.provider.model_id())
            .field("cache_dir", &self.store.dir())
            .field("general_loaded", &self.general.centroid.initialized())
            .field("failure_loaded", &self.failure.centroid.initialized())
            .finish()
    }
}

impl IntentClassifier {
    /// Creates a classifier with the built-in reference sets, caching under `cache_dir`.
    pub fn new<P: Into<PathBuf>>(provider: Arc<dyn EmbeddingProvider>, cache_dir: P) -> Self {
        Self::with_sets(
            provider,
            CentroidStore::new(cache_dir),
            ReferenceSet::general_questions(),
            ReferenceSet::failure_phrases(),
        )
    }

    /// Creates a classifier with custom reference sets and the default thresholds.
    pub fn with_sets(
        provider: Arc<dyn EmbeddingProvider>,
        store: CentroidStore,
        general: ReferenceSet,
        failure: ReferenceSet,
    ) -> Self {
        Self {
            provider,
            store,
            general: ReferenceSlot::new(general, ClassificationThreshold::GENERAL_INFO),
            failure: ReferenceSlot::new(failure, ClassificationThreshold::RETRIEVAL_FAILURE),
        }
    }

    /// Overrides both thresholds. Only valid before any centroid is loaded.
    #[cfg(any(test, feature = "mock"))]
    pub fn with_thresholds(
        mut self,
        general: ClassificationThreshold,
        failure: ClassificationThreshold,
    ) -> Self {
        self.general.threshold = general;
        self.failure.threshold = failure;
        self
    }

    /// Loads (or computes and persists) both centroids. Idempotent.
    ///
    /// Both sets are attempted even if one fails; the first error is returned.
    pub async fn ensure_reference_embeddings_loaded(&self) -> ClassifierResult<()> {
        let (general, failure) = futures_util::future::join(
            self.ensure_slot(&self.general),
            self.ensure_slot(&self.failure),
        )
        .await;
        general?;
        failure?;
        Ok(())
    }

    /// Returns `true` if `message` asks about the assistant or its documents.
    ///
    /// No length or whitespace filtering happens here; that is the caller's job.
    pub async fn is_general_info_query(&self, message: &str) -> ClassifierResult<bool> {
        let score = self.general_info_score(message).await?;
        Ok(self.general.threshold.admits(score))
    }

    /// Returns `true` if `answer` reads like "the context does not cover this".
    ///
    /// Pass the raw generated answer, before any source annotation is appended.
    pub async fn is_retrieval_failure(&self, answer_text: &str) -> ClassifierResult<bool> {
        let score = self.retrieval_failure_score(answer_text).await?;
        Ok(self.failure.threshold.admits(score))
    }

    /// Raw similarity of `message` to the general-question centroid.
    pub async fn general_info_score(&self, message: &str) -> ClassifierResult<f32> {
        self.score_against(&self.general, message).await
    }

    /// Raw similarity of `answer_text` to the failure-phrase centroid.
    pub async fn retrieval_failure_score(&self, answer_text: &str) -> ClassifierResult<f32> {
        self.score_against(&self.failure, answer_text).await
    }

    /// Returns `true` once both centroids are resident.
    pub fn is_loaded(&self) -> bool {
        self.general.centroid.initialized() && self.failure.centroid.initialized()
    }

    /// The general-question centroid, if loaded.
    pub fn general_centroid(&self) -> Option<&Embedding> {
        self.general.centroid.get()
    }

    /// The failure-phrase centroid, if loaded.
    pub fn failure_centroid(&self) -> Option<&Embedding> {
        self.failure.centroid.get()
    }

    /// Active `(general_info, retrieval_failure)` cutoffs.
    pub fn thresholds(&self) -> (ClassificationThreshold, ClassificationThreshold) {
        (self.general.threshold, self.failure.threshold)
    }

    /// Returns the durable cache.
    pub fn store(&self) -> &CentroidStore {
        &self.store
    }

    async fn ensure_slot(&self, slot: &ReferenceSlot) -> ClassifierResult<()> {
        slot.centroid
            .get_or_try_init(|| self.load_or_compute(&slot.set))
            .await?;
        Ok(())
    }

    async fn load_or_compute(&self, set: &ReferenceSet) -> ClassifierResult<Embedding> {
        let model_id = self.provider.model_id();

        match self
            .store
            .load(set, model_id, Some(self.provider.dimensions()))
        {
            Ok(Some(centroid)) => {
                info!(label = %set.label, dim = centroid.len(), "Loaded reference centroid from cache");
                return Ok(centroid);
            }
            Ok(None) => {
                debug!(label = %set.label, "No cached centroid; computing");
            }
            Err(e) => {
                warn!(label = %set.label, error = %e, "Discarding unusable cached centroid; recomputing");
            }
        }

        let centroid = self.provider.aggregate_embed(&set.example_texts).await?;
        if centroid.is_empty() || centroid.iter().any(|v| !v.is_finite()) {
            return Err(EmbeddingError::MalformedResponse {
                reason: format!("provider returned an unusable centroid for '{}'", set.label),
            }
            .into());
        }

        info!(
            label = %set.label,
            examples = set.example_texts.len(),
            dim = centroid.len(),
            "Computed reference centroid"
        );

        match self.store.save(set, model_id, &centroid) {
            Ok(path) => debug!(label = %set.label, path = %path.display(), "Persisted centroid"),
            Err(e) => {
                warn!(label = %set.label, error = %e, "Failed to persist centroid; keeping in memory only")
            }
        }

        Ok(centroid)
    }

    async fn score_against(&self, slot: &ReferenceSlot, text: &str) -> ClassifierResult<f32> {
        let centroid = slot
            .centroid
            .get()
            .ok_or_else(|| ClassifierError::NotLoaded {
                label: slot.set.label.clone(),
            })?;

        let embedding = self.provider.aggregate_embed(&[text.to_string()]).await?;
        let score = self.provider.similarity(centroid, &embedding);

        debug!(
            label = %slot.set.label,
            score,
            threshold = slot.threshold.value(),
            "Similarity to reference centroid"
        );

        Ok(score)
    }
}
