//! Scriptable embedding provider for tests.
//!
//! Every distinct input (a single text, or a whole aggregated list) is interned and
//! mapped to a vector tagged with its intern id. [`EmbeddingProvider::similarity`] then
//! looks the tagged inputs back up, so a test can say "this message scores 0.85
//! against anything" without caring about real vector geometry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::EmbeddingError;
use super::provider::{Embedding, EmbeddingProvider};

const AGGREGATE_SEPARATOR: char = '\u{1f}';

#[derive(Default)]
struct Interner {
    ids: HashMap<String, usize>,
    keys: Vec<String>,
}

impl Interner {
    fn intern(&mut self, key: String) -> usize {
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = self.keys.len();
        self.ids.insert(key.clone(), id);
        self.keys.push(key);
        id
    }

    fn resolve(&self, id: usize) -> Option<&str> {
        self.keys.get(id).map(String::as_str)
    }
}

/// Test double with call counters, scripted similarities, failures and latency.
pub struct MockEmbeddingProvider {
    model_id: String,
    dimensions: usize,
    interner: Mutex<Interner>,
    scores: Mutex<HashMap<String, f32>>,
    default_score: Mutex<f32>,
    aggregate_log: Mutex<Vec<Vec<String>>>,
    batch_calls: AtomicUsize,
    failing: AtomicBool,
    latency: Mutex<Option<Duration>>,
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbeddingProvider {
    /// Creates a mock with an 8-dimensional space and default similarity `0.0`.
    pub fn new() -> Self {
        Self::with_model_id("mock-embedding")
    }

    /// Creates a mock reporting `model_id`.
    pub fn with_model_id(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            dimensions: 8,
            interner: Mutex::new(Interner::default()),
            scores: Mutex::new(HashMap::new()),
            default_score: Mutex::new(0.0),
            aggregate_log: Mutex::new(Vec::new()),
            batch_calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            latency: Mutex::new(None),
        }
    }

    /// Any similarity involving the embedding of `text` returns `score`.
    pub fn set_score(&self, text: &str, score: f32) {
        self.scores.lock().insert(text.to_string(), score);
    }

    /// Similarity returned when no scripted score applies (and the vectors differ).
    pub fn set_default_score(&self, score: f32) {
        *self.default_score.lock() = score;
    }

    /// Makes every subsequent embedding call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Delays every aggregation call (widens race windows in concurrency tests).
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = Some(latency);
    }

    /// Total `aggregate_embed` calls.
    pub fn aggregate_calls(&self) -> usize {
        self.aggregate_log.lock().len()
    }

    /// `aggregate_embed` calls whose input was exactly `texts`.
    pub fn aggregate_calls_for<S: AsRef<str>>(&self, texts: &[S]) -> usize {
        self.aggregate_log
            .lock()
            .iter()
            .filter(|logged| {
                logged.len() == texts.len()
                    && logged.iter().zip(texts).all(|(a, b)| a == b.as_ref())
            })
            .count()
    }

    /// Total `embed_batch` calls.
    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    fn tagged_vector(&self, key: String) -> Embedding {
        let id = self.interner.lock().intern(key);
        let mut vector = vec![0.0; self.dimensions];
        vector[0] = (id + 1) as f32;
        vector
    }

    fn key_of(&self, vector: &[f32]) -> Option<String> {
        let tag = *vector.first()?;
        if tag < 1.0 || tag.fract() != 0.0 {
            return None;
        }
        self.interner
            .lock()
            .resolve(tag as usize - 1)
            .map(str::to_string)
    }

    fn check_failing(&self) -> Result<(), EmbeddingError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EmbeddingError::Api {
                status: 503,
                body: "mock provider unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        Ok(texts.iter().map(|t| self.tagged_vector(t.clone())).collect())
    }

    async fn aggregate_embed(&self, texts: &[String]) -> Result<Embedding, EmbeddingError> {
        self.aggregate_log.lock().push(texts.to_vec());

        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        self.check_failing()?;
        if texts.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let key = texts.join(&AGGREGATE_SEPARATOR.to_string());
        Ok(self.tagged_vector(key))
    }

    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        let scores = self.scores.lock();
        for key in [self.key_of(a), self.key_of(b)].into_iter().flatten() {
            if let Some(score) = scores.get(&key) {
                return *score;
            }
        }
        if a == b { 1.0 } else { *self.default_score.lock() }
    }
}
