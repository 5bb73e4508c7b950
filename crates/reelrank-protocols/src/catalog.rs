//! Store protocol definitions.
//!
//! The item catalog and the watch event log are external collaborators of
//! the ranking engine. Both are read-only from the engine's point of view.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::types::{Item, ItemId, Review, UserId, WatchCount, WatchEvent};

/// Item records and their full-text index.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Full collection scan.
    ///
    /// Order is implementation-defined but must be stable for the duration
    /// of one call; ranking ties fall back to it.
    async fn fetch_all_items(&self) -> Result<Vec<Item>, StoreError>;

    /// Exact lookup by identifier.
    async fn get_item(&self, id: &ItemId) -> Result<Option<Item>, StoreError>;

    /// Full-text search, ordered by the store's own relevance metric.
    ///
    /// Higher relevance means a better match.
    async fn text_search(&self, query: &str) -> Result<Vec<(Item, f32)>, StoreError>;

    /// All reviews recorded for an item.
    async fn reviews_for_item(&self, id: &ItemId) -> Result<Vec<Review>, StoreError>;

    /// Number of items in the collection.
    async fn item_count(&self) -> Result<usize, StoreError>;
}

/// Append-only watch activity.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Number of watch events for `item` at or after `since`.
    async fn count_events(&self, item: &ItemId, since: DateTime<Utc>) -> Result<u64, StoreError>;

    /// Items with the most watch events at or after `since`, most watched first.
    async fn top_watched(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<WatchCount>, StoreError>;

    /// Every watch event recorded for a user.
    async fn user_history(&self, user: &UserId) -> Result<Vec<WatchEvent>, StoreError>;
}
