//! Error types for the ReelRank protocol layer.

mod embedding;
mod ranking;
mod store;

pub use embedding::*;
pub use ranking::*;
pub use store::*;
