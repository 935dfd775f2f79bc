//! BLAKE3 helpers for content-addressed cache keys and point ids.

use blake3::Hasher;

/// Fingerprints a reference set: the embedding model id plus every example text.
///
/// Each text is length-prefixed, so `["ab", "c"]` and `["a", "bc"]` never
/// collide. The model id is included because a centroid is only meaningful in
/// the vector space that produced it.
pub fn fingerprint_examples<S: AsRef<str>>(model_id: &str, texts: &[S]) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(&(model_id.len() as u64).to_le_bytes());
    hasher.update(model_id.as_bytes());
    hasher.update(&(texts.len() as u64).to_le_bytes());
    for text in texts {
        let text = text.as_ref();
        hasher.update(&(text.len() as u64).to_le_bytes());
        hasher.update(text.as_bytes());
    }
    *hasher.finalize().as_bytes()
}

/// Returns the first `n_bytes` of `hash` as lowercase hex.
pub fn fingerprint_hex(hash: &[u8; 32], n_bytes: usize) -> String {
    hash.iter()
        .take(n_bytes.min(32))
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Computes a 64-bit hash (first 8 bytes of BLAKE3, little-endian).
///
/// Used for vector-store point ids, where a rare collision only overwrites
/// one chunk with another from the same re-index run.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Point id for chunk `index` of the document at `path`.
#[inline]
pub fn chunk_point_id(path: &str, index: usize) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(path.as_bytes());
    hasher.update(b"#");
    hasher.update(&(index as u64).to_le_bytes());
    hash_to_u64(hasher.finalize().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_determinism() {
        let texts = ["What documents do you have?", "List all the files"];
        assert_eq!(
            fingerprint_examples("model-a", &texts),
            fingerprint_examples("model-a", &texts)
        );
    }

    #[test]
    fn test_fingerprint_changes_with_examples() {
        let a = fingerprint_examples("m", &["one", "two"]);
        let b = fingerprint_examples("m", &["one", "two", "three"]);
        let c = fingerprint_examples("m", &["two", "one"]);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_fingerprint_length_prefix_prevents_concatenation_collision() {
        assert_ne!(
            fingerprint_examples("m", &["ab", "c"]),
            fingerprint_examples("m", &["a", "bc"])
        );
    }

    #[test]
    fn test_fingerprint_changes_with_model() {
        let texts = ["same"];
        assert_ne!(
            fingerprint_examples("text-embedding-3-small", &texts),
            fingerprint_examples("text-embedding-3-large", &texts)
        );
    }

    #[test]
    fn test_fingerprint_hex_prefix() {
        let hash = [0xABu8; 32];
        assert_eq!(fingerprint_hex(&hash, 4), "abababab");
        assert_eq!(fingerprint_hex(&hash, 100).len(), 64);
    }

    #[test]
    fn test_chunk_point_id_distinct_per_index() {
        let a = chunk_point_id("docs/policy.md", 0);
        let b = chunk_point_id("docs/policy.md", 1);
        let c = chunk_point_id("docs/other.md", 0);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, chunk_point_id("docs/policy.md", 0));
    }
}
