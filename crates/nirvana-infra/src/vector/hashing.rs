//! Feature-hashing embedder.
//!
//! Maps each lowercase alphanumeric token to a signed slot of a fixed-size
//! vector and L2-normalises the result. Deterministic, dependency-free and
//! instant, so it serves offline development and tests where downloading
//! an ONNX model is not an option. Similarity is lexical, not semantic.

use nirvana_core::retrieval::embedder::Embedder;
use nirvana_types::error::BackendError;

/// Model name reported by [`HashingEmbedder`].
pub const HASHING_MODEL_NAME: &str = "feature-hashing";

/// Default output dimension, matching the fastembed model.
pub const DEFAULT_HASHING_DIMENSION: usize = 384;

pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self, BackendError> {
        if dimension == 0 {
            return Err(BackendError::Embedding(
                "hashing dimension must be positive".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = fnv1a(&token.to_lowercase());
            let slot = (hash % self.dimension as u64) as usize;
            // Top bit picks the sign so colliding tokens tend to cancel.
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[slot] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_HASHING_DIMENSION,
        }
    }
}

/// 64-bit FNV-1a. Stable across processes, unlike `DefaultHasher`.
fn fnv1a(token: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    token
        .bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

impl Embedder for HashingEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, BackendError> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }

    fn model_name(&self) -> &str {
        HASHING_MODEL_NAME
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::memory::cosine_similarity;

    async fn embed_one(embedder: &HashingEmbedder, text: &str) -> Vec<f32> {
        embedder
            .embed(&[text.to_string()])
            .await
            .unwrap()
            .pop()
            .unwrap()
    }

    #[tokio::test]
    async fn test_deterministic_and_normalised() {
        let embedder = HashingEmbedder::default();
        let a = embed_one(&embedder, "I feel great today").await;
        let b = embed_one(&embedder, "I feel great today").await;
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_HASHING_DIMENSION);

        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_case_and_punctuation_insensitive() {
        let embedder = HashingEmbedder::default();
        let a = embed_one(&embedder, "Feeling happy!").await;
        let b = embed_one(&embedder, "feeling HAPPY").await;
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_shared_words_score_higher() {
        let embedder = HashingEmbedder::default();
        let query = embed_one(&embedder, "slept badly last night").await;
        let related = embed_one(&embedder, "I slept badly again").await;
        let unrelated = embed_one(&embedder, "lunch with colleagues").await;
        assert!(cosine_similarity(&query, &related) > cosine_similarity(&query, &unrelated));
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(8).unwrap();
        let v = embed_one(&embedder, "  ...  ").await;
        assert_eq!(v, vec![0.0; 8]);
    }

    #[tokio::test]
    async fn test_one_vector_per_text_in_order() {
        let embedder = HashingEmbedder::new(16).unwrap();
        let texts = vec!["alpha".to_string(), "beta".to_string(), "alpha".to_string()];
        let vectors = embedder.embed(&texts).await.unwrap();
        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[0], vectors[2]);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(HashingEmbedder::new(0).is_err());
    }
}
