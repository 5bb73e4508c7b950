//! Weighted score fusion and top-K selection.

use std::cmp::Ordering;

use reelrank_config::{HybridWeights, RankedWeights};
use reelrank_protocols::ScoredCandidate;

/// Title-focused fusion of semantic similarity and lexical overlap.
pub fn fuse_hybrid(semantic: f32, lexical: f32, weights: &HybridWeights) -> f32 {
    weights.semantic * semantic + weights.lexical * lexical
}

/// Full-signal fusion of semantic similarity, rating and popularity.
pub fn fuse_ranked(semantic: f32, rating: f32, popularity: f32, weights: &RankedWeights) -> f32 {
    weights.semantic * semantic + weights.rating * rating + weights.popularity * popularity
}

/// Stable sort by descending score.
///
/// Equal scores keep their input order. Incomparable scores are treated as
/// equal so they never reorder their neighbours.
pub fn sort_by_score(candidates: &mut [ScoredCandidate]) {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

/// Sort descending and keep the first `top_k` candidates.
pub fn select_top_k(mut candidates: Vec<ScoredCandidate>, top_k: usize) -> Vec<ScoredCandidate> {
    sort_by_score(&mut candidates);
    candidates.truncate(top_k);
    candidates
}
