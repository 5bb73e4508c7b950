//! # ReelRank Protocols
//!
//! Domain types and collaborator contracts for the ReelRank ranking engine.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`Catalog`] - Item records, full-text search and reviews
//! - [`EventLog`] - Watch activity counts and aggregations
//! - [`EmbeddingProvider`] - Text to fixed-length vector

pub mod catalog;
pub mod embedding;
pub mod error;
pub mod types;

// Re-export core traits
pub use catalog::{Catalog, EventLog};
pub use embedding::{Embedding, EmbeddingProvider};
pub use error::{EmbeddingError, RankingError, StoreError};
pub use types::*;
