//! # ReelRank Ranking
//!
//! Scores catalog items against a free-text query by fusing lexical overlap,
//! embedding similarity, recent popularity and static rating.
//!
//! ## Modes
//!
//! - `basic` - store-native full-text relevance, no fusion
//! - `hybrid` - title semantic similarity and title lexical overlap
//! - `ranked` - title semantic similarity, rating and 30-day popularity

mod basic;
mod cache;
mod engine;
pub mod fusion;
pub mod scorers;

#[cfg(test)]
mod test_support;

pub use basic::basic_search;
pub use cache::EmbeddingCache;
pub use engine::{RankingEngine, RankingRequest, SearchMode};
