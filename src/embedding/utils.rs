use super::error::EmbeddingError;
use super::provider::Embedding;

/// Cosine similarity; `0.0` for mismatched lengths, empty or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

/// Component-wise mean of equally sized vectors.
pub fn mean_pool(vectors: &[Embedding]) -> Result<Embedding, EmbeddingError> {
    let first = vectors.first().ok_or(EmbeddingError::EmptyInput)?;
    let dim = first.len();

    let mut sum = vec![0.0f64; dim];
    for vector in vectors {
        if vector.len() != dim {
            return Err(EmbeddingError::DimensionMismatch {
                expected: dim,
                actual: vector.len(),
            });
        }
        for (acc, x) in sum.iter_mut().zip(vector) {
            *acc += f64::from(*x);
        }
    }

    let n = vectors.len() as f64;
    Ok(sum.into_iter().map(|x| (x / n) as f32).collect())
}

/// Scales `vector` to unit length in place (zero vectors are left alone).
pub fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}
