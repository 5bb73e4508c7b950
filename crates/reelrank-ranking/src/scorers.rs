//! Per-candidate relevance signals.
//!
//! Every function here is pure. Degenerate inputs map to defined fallback
//! values instead of errors.

use std::collections::HashSet;

use chrono::{DateTime, TimeDelta, Utc};
use reelrank_protocols::{Embedding, EmbeddingError, Item, RankingError};
use tracing::warn;

/// Fraction of query tokens that also occur in `text`.
///
/// Both sides are lower-cased and split on whitespace. The numerator counts
/// distinct shared tokens; the denominator counts every query token, so a
/// repeated query word lowers the score.
pub fn lexical_overlap(query: &str, text: &str) -> f32 {
    let query_tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if query_tokens.is_empty() {
        return 0.0;
    }

    let text_tokens: HashSet<String> = text.split_whitespace().map(str::to_lowercase).collect();
    let query_set: HashSet<&String> = query_tokens.iter().collect();
    let shared = query_set
        .into_iter()
        .filter(|token| text_tokens.contains(*token))
        .count();

    shared as f32 / query_tokens.len() as f32
}

/// Cosine similarity between two embeddings.
///
/// Returns 0 when either vector has zero norm or the result is not finite.
/// Vectors of different length are malformed provider output.
pub fn semantic_similarity(query: &Embedding, item: &Embedding) -> Result<f32, EmbeddingError> {
    if query.vector.len() != item.vector.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: query.vector.len(),
            actual: item.vector.len(),
        });
    }

    let norm_q = query.norm();
    let norm_v = item.norm();
    if norm_q == 0.0 || norm_v == 0.0 {
        return Ok(0.0);
    }

    let dot: f32 = query
        .vector
        .iter()
        .zip(item.vector.iter())
        .map(|(a, b)| a * b)
        .sum();

    let similarity = dot / (norm_q * norm_v);
    if similarity.is_finite() {
        Ok(similarity)
    } else {
        Ok(0.0)
    }
}

/// Recent activity normalized against a saturation count.
pub fn popularity_score(count: u64, saturation: u32) -> f32 {
    if saturation == 0 {
        return if count > 0 { 1.0 } else { 0.0 };
    }
    (count as f32 / saturation as f32).min(1.0)
}

/// Start of an activity window of `days` ending at `as_of`.
///
/// Fails instead of panicking when the window does not fit chrono's range.
pub fn window_start(as_of: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>, RankingError> {
    TimeDelta::try_days(days)
        .and_then(|window| as_of.checked_sub_signed(window))
        .ok_or_else(|| {
            RankingError::Configuration(format!(
                "activity window of {} days is out of range",
                days
            ))
        })
}

/// Stored rating divided by the rating scale. Missing ratings score 0.
///
/// Out-of-range ratings pass through unchanged unless `clamp` is set.
pub fn rating_score(item: &Item, scale: f32, clamp: bool) -> f32 {
    let rating = item.rating_or_default();
    if !rating.is_finite() || !(scale > 0.0) || !scale.is_finite() {
        warn!("Ignoring unusable rating {} (scale {})", rating, scale);
        return 0.0;
    }

    let score = rating / scale;
    if !(0.0..=1.0).contains(&score) {
        warn!("Rating {} is outside [0, {}]", rating, scale);
        if clamp {
            return score.clamp(0.0, 1.0);
        }
    }
    score
}

#[cfg(test)]
#[path = "scorers_tests.rs"]
mod tests;
