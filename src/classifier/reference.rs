use crate::constants::{
    FAILURE_PHRASE_EXAMPLES, FAILURE_PHRASES_LABEL, GENERAL_INFO_THRESHOLD,
    GENERAL_QUESTION_EXAMPLES, GENERAL_QUESTIONS_LABEL, RETRIEVAL_FAILURE_THRESHOLD,
};
use crate::hashing::fingerprint_examples;

/// A named class of reference texts whose aggregate embedding is the class centroid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSet {
    /// Class identifier; also the cache-entry prefix.
    pub label: String,
    /// Canonical examples, in order.
    pub example_texts: Vec<String>,
}

impl ReferenceSet {
    /// Creates a reference set from a label and its examples.
    pub fn new<L, I, S>(label: L, example_texts: I) -> Self
    where
        L: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            example_texts: example_texts.into_iter().map(Into::into).collect(),
        }
    }

    /// Questions about the assistant and its document inventory.
    pub fn general_questions() -> Self {
        Self::new(
            GENERAL_QUESTIONS_LABEL,
            GENERAL_QUESTION_EXAMPLES.iter().copied(),
        )
    }

    /// Phrases an answer contains when retrieval found nothing relevant.
    pub fn failure_phrases() -> Self {
        Self::new(FAILURE_PHRASES_LABEL, FAILURE_PHRASE_EXAMPLES.iter().copied())
    }

    /// Content address of this set in the vector space of `model_id`.
    pub fn fingerprint(&self, model_id: &str) -> [u8; 32] {
        fingerprint_examples(model_id, &self.example_texts)
    }
}

/// Similarity cutoff for class membership (strictly greater than).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationThreshold(f32);

impl ClassificationThreshold {
    /// Cutoff for general-info questions.
    pub const GENERAL_INFO: Self = Self(GENERAL_INFO_THRESHOLD);
    /// Cutoff for retrieval-failure answers.
    pub const RETRIEVAL_FAILURE: Self = Self(RETRIEVAL_FAILURE_THRESHOLD);

    /// Returns `true` if `score` is strictly above the cutoff.
    #[inline]
    pub fn admits(&self, score: f32) -> bool {
        score > self.0
    }

    /// Builds an arbitrary cutoff for tests.
    #[cfg(any(test, feature = "mock"))]
    pub fn custom(value: f32) -> Self {
        Self(value)
    }

    /// Returns the raw cutoff.
    #[inline]
    pub fn value(&self) -> f32 {
        self.0
    }
}
