//! Embedding provider protocol.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EmbeddingError;

/// Fixed-length vector representation of a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    /// Vector representation.
    pub vector: Vec<f32>,
    /// Dimension of the embedding.
    pub dimension: usize,
}

impl Embedding {
    pub fn new(vector: Vec<f32>) -> Self {
        let dimension = vector.len();
        Self { vector, dimension }
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f32 {
        self.vector.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.norm() == 0.0
    }
}

/// Trait for embedding providers.
///
/// Implementations must be pure: the same text embedded by the same model
/// always yields the same vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier, used to key cached item vectors.
    fn model_id(&self) -> &str;

    /// Generate embedding for text.
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError>;

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;
}
