//! SQLite catalog for ReelRank.
//!
//! Stores items, watch events and reviews in one database file and keeps an
//! FTS5 index over item titles, directors and cast in sync through triggers.

mod fixture;
mod schema;
mod store;

pub use fixture::{CatalogFixture, ImportSummary, ItemRecord, ReviewRecord, WatchRecord};
pub use store::SqliteCatalog;
