//! Hashed bag-of-words embeddings.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use reelrank_protocols::{Embedding, EmbeddingError, EmbeddingProvider};

/// Model identifier reported by [`HashEmbedding`].
pub const HASH_MODEL_ID: &str = "hash-bow-v1";

const DEFAULT_DIMENSION: usize = 384;

/// Deterministic embedding that hashes each lower-cased token into a signed bucket.
///
/// Texts sharing words land close together; there is no notion of synonymy.
/// An empty text yields the zero vector.
pub struct HashEmbedding {
    dimension: usize,
}

impl HashEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash_text(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0f32; self.dimension];

        for word in text.split_whitespace() {
            // DefaultHasher::new() uses fixed keys, so buckets are stable across runs.
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            let hash = hasher.finish();

            let idx = (hash % self.dimension as u64) as usize;
            let sign = if (hash >> 63) & 1 == 0 { 1.0 } else { -1.0 };
            vector[idx] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Embedding::new(vector)
    }
}

impl Default for HashEmbedding {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedding {
    fn model_id(&self) -> &str {
        HASH_MODEL_ID
    }

    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        Ok(self.hash_text(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.hash_text(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
