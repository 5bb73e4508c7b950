//! JSON fixture format for seeding a catalog.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reelrank_protocols::{Item, Review, StoreError};

/// Contents of a catalog fixture file.
///
/// ```json
/// { "items": [...], "watch_history": [...], "reviews": [...] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFixture {
    #[serde(default)]
    pub items: Vec<ItemRecord>,
    #[serde(default)]
    pub watch_history: Vec<WatchRecord>,
    #[serde(default)]
    pub reviews: Vec<ReviewRecord>,
}

impl CatalogFixture {
    pub fn from_json(content: &str) -> Result<Self, StoreError> {
        serde_json::from_str(content)
            .map_err(|e| StoreError::MalformedRecord(format!("invalid fixture: {}", e)))
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            StoreError::StorageError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }
}

/// An item as written in a fixture. A missing id is assigned on import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub release_year: i32,
    #[serde(default)]
    pub rating: Option<f32>,
}

impl ItemRecord {
    pub fn into_item(self) -> Item {
        Item {
            id: self
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
                .into(),
            title: self.title,
            director: self.director,
            cast: self.cast,
            release_year: self.release_year,
            rating: self.rating,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub item_id: String,
    pub user_id: String,
    pub watched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub item_id: String,
    pub user_id: String,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub comment: String,
    /// Defaults to the import time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ReviewRecord {
    pub fn into_review(self, now: DateTime<Utc>) -> Review {
        Review {
            id: self
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            item_id: self.item_id.into(),
            user_id: self.user_id.into(),
            rating: self.rating,
            comment: self.comment,
            created_at: self.created_at.unwrap_or(now),
        }
    }
}

/// Row counts written by one import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub items: usize,
    pub watch_events: usize,
    pub reviews: usize,
}
