//! Ranking-related configuration types.

use serde::{Deserialize, Serialize};

/// Ranking engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Number of results returned by fused modes.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Recency window for popularity counts, in days.
    #[serde(default = "default_popularity_window")]
    pub popularity_window_days: i64,

    /// Event count at which popularity saturates to 1.0.
    #[serde(default = "default_popularity_saturation")]
    pub popularity_saturation: u32,

    /// Upper end of the stored rating scale.
    #[serde(default = "default_rating_scale")]
    pub rating_scale: f32,

    /// Clamp normalized ratings into [0, 1]. Off reproduces raw division.
    #[serde(default)]
    pub clamp_rating: bool,

    /// Candidates scored concurrently within one pass.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Optional per-pass deadline in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,

    #[serde(default)]
    pub hybrid: HybridWeights,

    #[serde(default)]
    pub ranked: RankedWeights,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            popularity_window_days: default_popularity_window(),
            popularity_saturation: default_popularity_saturation(),
            rating_scale: default_rating_scale(),
            clamp_rating: false,
            max_concurrency: default_max_concurrency(),
            deadline_ms: None,
            hybrid: HybridWeights::default(),
            ranked: RankedWeights::default(),
        }
    }
}

fn default_top_k() -> usize {
    10
}

fn default_popularity_window() -> i64 {
    30
}

fn default_popularity_saturation() -> u32 {
    10
}

fn default_rating_scale() -> f32 {
    10.0
}

fn default_max_concurrency() -> usize {
    8
}

/// Weights for the title-focused hybrid mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridWeights {
    #[serde(default = "default_hybrid_semantic")]
    pub semantic: f32,

    #[serde(default = "default_hybrid_lexical")]
    pub lexical: f32,
}

impl HybridWeights {
    pub fn total(&self) -> f32 {
        self.semantic + self.lexical
    }

    pub fn as_slice(&self) -> [f32; 2] {
        [self.semantic, self.lexical]
    }
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            semantic: default_hybrid_semantic(),
            lexical: default_hybrid_lexical(),
        }
    }
}

fn default_hybrid_semantic() -> f32 {
    0.8
}

fn default_hybrid_lexical() -> f32 {
    0.2
}

/// Weights for the full-signal ranked mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedWeights {
    #[serde(default = "default_ranked_semantic")]
    pub semantic: f32,

    #[serde(default = "default_ranked_rating")]
    pub rating: f32,

    #[serde(default = "default_ranked_popularity")]
    pub popularity: f32,
}

impl RankedWeights {
    pub fn total(&self) -> f32 {
        self.semantic + self.rating + self.popularity
    }

    pub fn as_slice(&self) -> [f32; 3] {
        [self.semantic, self.rating, self.popularity]
    }
}

impl Default for RankedWeights {
    fn default() -> Self {
        Self {
            semantic: default_ranked_semantic(),
            rating: default_ranked_rating(),
            popularity: default_ranked_popularity(),
        }
    }
}

fn default_ranked_semantic() -> f32 {
    0.5
}

fn default_ranked_rating() -> f32 {
    0.3
}

fn default_ranked_popularity() -> f32 {
    0.2
}
