//! Ranking pass errors.

use thiserror::Error;

use super::{EmbeddingError, StoreError};

/// Failure of a whole ranking pass. No partial ranking accompanies it.
#[derive(Debug, Error)]
pub enum RankingError {
    /// Missing or empty query. Nothing was fetched or scored.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The store or the embedding provider failed or returned malformed data.
    #[error("Dependency error: {0}")]
    Dependency(String),

    /// The caller's deadline passed before scoring finished.
    #[error("Ranking deadline exceeded")]
    DeadlineExceeded,

    /// A ranking setting cannot be applied, such as a window that reaches
    /// outside the representable time range.
    #[error("Invalid ranking configuration: {0}")]
    Configuration(String),
}

impl RankingError {
    /// Whether the failure is the caller's fault rather than a dependency's.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<StoreError> for RankingError {
    fn from(err: StoreError) -> Self {
        Self::Dependency(format!("store: {}", err))
    }
}

impl From<EmbeddingError> for RankingError {
    fn from(err: EmbeddingError) -> Self {
        Self::Dependency(format!("embedding provider: {}", err))
    }
}
