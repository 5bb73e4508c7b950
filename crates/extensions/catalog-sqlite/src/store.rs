//! SQLite catalog and event log implementation.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, params};
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use reelrank_protocols::{
    Catalog, EventLog, Item, ItemId, Review, StoreError, UserId, WatchCount, WatchEvent,
};

use crate::fixture::{CatalogFixture, ImportSummary};
use crate::schema::init_schema;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

const ITEM_COLUMNS: &str = "id, title, director, cast_json, release_year, rating";

/// SQLite-backed [`Catalog`] and [`EventLog`].
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Create a new in-memory database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;
        Self::with_connection(conn).await
    }

    /// Open or create a file-backed database.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(path)
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;
        Self::with_connection(conn).await
    }

    async fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.call(|conn| Ok(init_schema(conn)?))
            .await
            .map_err(|e| StoreError::StorageError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Insert an item, or replace the fields of the item with the same id.
    ///
    /// Replacing keeps the item's position in full scans.
    pub async fn upsert_item(&self, item: &Item) -> Result<(), StoreError> {
        let row = ItemInsert::from_item(item)?;
        self.conn
            .call(move |conn| Ok(row.upsert(conn)?))
            .await
            .map_err(|e| StoreError::StorageError(e.to_string()))
    }

    /// Append a watch event and return its id.
    pub async fn record_watch(
        &self,
        item: &ItemId,
        user: &UserId,
        watched_at: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        let row = WatchInsert {
            id: uuid::Uuid::new_v4().to_string(),
            item_id: item.to_string(),
            user_id: user.to_string(),
            watched_at: watched_at.timestamp_millis(),
        };
        let id = row.id.clone();
        self.conn
            .call(move |conn| Ok(row.insert(conn)?))
            .await
            .map_err(|e| StoreError::StorageError(e.to_string()))?;
        Ok(id)
    }

    /// Store a review. An existing review with the same id is replaced.
    pub async fn add_review(&self, review: &Review) -> Result<(), StoreError> {
        let row = ReviewInsert::from_review(review);
        self.conn
            .call(move |conn| Ok(row.upsert(conn)?))
            .await
            .map_err(|e| StoreError::StorageError(e.to_string()))
    }

    /// Load a fixture in a single transaction.
    pub async fn import_fixture(
        &self,
        fixture: CatalogFixture,
    ) -> Result<ImportSummary, StoreError> {
        let now = Utc::now();
        let items = fixture
            .items
            .into_iter()
            .map(|record| ItemInsert::from_item(&record.into_item()))
            .collect::<Result<Vec<_>, _>>()?;
        let watches: Vec<WatchInsert> = fixture
            .watch_history
            .into_iter()
            .map(|record| WatchInsert {
                id: record
                    .id
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                item_id: record.item_id,
                user_id: record.user_id,
                watched_at: record.watched_at.timestamp_millis(),
            })
            .collect();
        let reviews: Vec<ReviewInsert> = fixture
            .reviews
            .into_iter()
            .map(|record| ReviewInsert::from_review(&record.into_review(now)))
            .collect();

        let summary = ImportSummary {
            items: items.len(),
            watch_events: watches.len(),
            reviews: reviews.len(),
        };

        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                for item in &items {
                    item.upsert(&tx)?;
                }
                for watch in &watches {
                    watch.insert(&tx)?;
                }
                for review in &reviews {
                    review.upsert(&tx)?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(|e| StoreError::StorageError(e.to_string()))?;

        info!(
            "Imported {} items, {} watch events, {} reviews",
            summary.items, summary.watch_events, summary.reviews
        );
        Ok(summary)
    }
}

#[async_trait]
impl Catalog for SqliteCatalog {
    async fn fetch_all_items(&self) -> Result<Vec<Item>, StoreError> {
        let rows = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM items ORDER BY rowid",
                    ITEM_COLUMNS
                ))?;
                let rows = stmt
                    .query_map([], ItemRow::from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;

        debug!("Fetched {} items", rows.len());
        rows.into_iter().map(ItemRow::into_item).collect()
    }

    async fn get_item(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        let id = id.to_string();
        let row = self
            .conn
            .call(move |conn| {
                let row = conn
                    .query_row(
                        &format!("SELECT {} FROM items WHERE id = ?1", ITEM_COLUMNS),
                        [&id],
                        ItemRow::from_row,
                    )
                    .optional()?;
                Ok(row)
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;

        row.map(ItemRow::into_item).transpose()
    }

    async fn text_search(&self, query: &str) -> Result<Vec<(Item, f32)>, StoreError> {
        let match_expr = escape_fts_query(query);
        if match_expr.is_empty() {
            return Ok(vec![]);
        }

        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT i.id, i.title, i.director, i.cast_json, i.release_year, i.rating,
                           -bm25(items_fts) AS relevance
                    FROM items_fts
                    JOIN items i ON i.rowid = items_fts.rowid
                    WHERE items_fts MATCH ?1
                    ORDER BY relevance DESC, i.rowid ASC
                    "#,
                )?;
                let rows = stmt
                    .query_map([&match_expr], |row| {
                        Ok((ItemRow::from_row(row)?, row.get::<_, f64>(6)? as f32))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(|e| StoreError::QueryError(format!("FTS search failed: {}", e)))?;

        debug!("Text search matched {} items", rows.len());
        rows.into_iter()
            .map(|(row, relevance)| Ok((row.into_item()?, relevance)))
            .collect()
    }

    async fn reviews_for_item(&self, id: &ItemId) -> Result<Vec<Review>, StoreError> {
        let id = id.to_string();
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, item_id, user_id, rating, comment, created_at
                     FROM reviews WHERE item_id = ?1 ORDER BY created_at, rowid",
                )?;
                let rows = stmt
                    .query_map([&id], |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, Option<f64>>(3)?,
                            row.get::<_, String>(4)?,
                            row.get::<_, i64>(5)?,
                        ))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;

        rows.into_iter()
            .map(|(id, item_id, user_id, rating, comment, created_at)| {
                Ok(Review {
                    created_at: millis_to_datetime(created_at, &id)?,
                    id,
                    item_id: item_id.into(),
                    user_id: user_id.into(),
                    rating: rating.map(|r| r as f32),
                    comment,
                })
            })
            .collect()
    }

    async fn item_count(&self) -> Result<usize, StoreError> {
        let count = self
            .conn
            .call(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM items", [], |row| {
                    row.get::<_, i64>(0)
                })?)
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;
        Ok(count.max(0) as usize)
    }
}

#[async_trait]
impl EventLog for SqliteCatalog {
    async fn count_events(&self, item: &ItemId, since: DateTime<Utc>) -> Result<u64, StoreError> {
        let item = item.to_string();
        let since = since.timestamp_millis();
        let count = self
            .conn
            .call(move |conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM watch_history WHERE item_id = ?1 AND watched_at >= ?2",
                    params![item, since],
                    |row| row.get::<_, i64>(0),
                )?)
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;
        Ok(count.max(0) as u64)
    }

    async fn top_watched(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<WatchCount>, StoreError> {
        let since = since.timestamp_millis();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT w.item_id, i.title, i.release_year, COUNT(*) AS watch_count
                    FROM watch_history w
                    JOIN items i ON i.id = w.item_id
                    WHERE w.watched_at >= ?1
                    GROUP BY w.item_id
                    ORDER BY watch_count DESC, w.item_id ASC
                    LIMIT ?2
                    "#,
                )?;
                let rows = stmt
                    .query_map(params![since, limit], |row| {
                        Ok(WatchCount {
                            item_id: row.get::<_, String>(0)?.into(),
                            title: row.get(1)?,
                            release_year: row.get(2)?,
                            watch_count: row.get::<_, i64>(3)?.max(0) as u64,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;
        Ok(rows)
    }

    async fn user_history(&self, user: &UserId) -> Result<Vec<WatchEvent>, StoreError> {
        let user = user.to_string();
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, item_id, user_id, watched_at FROM watch_history
                     WHERE user_id = ?1 ORDER BY watched_at DESC, rowid DESC",
                )?;
                let rows = stmt
                    .query_map([&user], |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, i64>(3)?,
                        ))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;

        rows.into_iter()
            .map(|(id, item_id, user_id, watched_at)| {
                Ok(WatchEvent {
                    watched_at: millis_to_datetime(watched_at, &id)?,
                    id,
                    item_id: item_id.into(),
                    user_id: user_id.into(),
                })
            })
            .collect()
    }
}

/// Raw `items` row. Decoded into an [`Item`] outside the connection thread.
struct ItemRow {
    id: String,
    title: String,
    director: String,
    cast_json: String,
    release_year: i32,
    rating: Option<f64>,
}

impl ItemRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            director: row.get(2)?,
            cast_json: row.get(3)?,
            release_year: row.get(4)?,
            rating: row.get(5)?,
        })
    }

    fn into_item(self) -> Result<Item, StoreError> {
        let cast: Vec<String> = serde_json::from_str(&self.cast_json).map_err(|e| {
            StoreError::MalformedRecord(format!("item {} has invalid cast: {}", self.id, e))
        })?;
        Ok(Item {
            id: self.id.into(),
            title: self.title,
            director: self.director,
            cast,
            release_year: self.release_year,
            rating: self.rating.map(|r| r as f32),
        })
    }
}

struct ItemInsert {
    id: String,
    title: String,
    director: String,
    cast_json: String,
    cast_text: String,
    release_year: i32,
    rating: Option<f64>,
}

impl ItemInsert {
    fn from_item(item: &Item) -> Result<Self, StoreError> {
        let cast_json = serde_json::to_string(&item.cast)
            .map_err(|e| StoreError::StorageError(e.to_string()))?;
        Ok(Self {
            id: item.id.to_string(),
            title: item.title.clone(),
            director: item.director.clone(),
            cast_json,
            cast_text: item.cast.join(" "),
            release_year: item.release_year,
            rating: item.rating.map(f64::from),
        })
    }

    fn upsert(&self, conn: &rusqlite::Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO items (id, title, director, cast_json, cast_text, release_year, rating)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                director = excluded.director,
                cast_json = excluded.cast_json,
                cast_text = excluded.cast_text,
                release_year = excluded.release_year,
                rating = excluded.rating",
            params![
                self.id,
                self.title,
                self.director,
                self.cast_json,
                self.cast_text,
                self.release_year,
                self.rating
            ],
        )?;
        Ok(())
    }
}

struct WatchInsert {
    id: String,
    item_id: String,
    user_id: String,
    watched_at: i64,
}

impl WatchInsert {
    fn insert(&self, conn: &rusqlite::Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO watch_history (id, item_id, user_id, watched_at) VALUES (?1, ?2, ?3, ?4)",
            params![self.id, self.item_id, self.user_id, self.watched_at],
        )?;
        Ok(())
    }
}

struct ReviewInsert {
    id: String,
    item_id: String,
    user_id: String,
    rating: Option<f64>,
    comment: String,
    created_at: i64,
}

impl ReviewInsert {
    fn from_review(review: &Review) -> Self {
        Self {
            id: review.id.clone(),
            item_id: review.item_id.to_string(),
            user_id: review.user_id.to_string(),
            rating: review.rating.map(f64::from),
            comment: review.comment.clone(),
            created_at: review.created_at.timestamp_millis(),
        }
    }

    fn upsert(&self, conn: &rusqlite::Connection) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO reviews (id, item_id, user_id, rating, comment, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                self.id,
                self.item_id,
                self.user_id,
                self.rating,
                self.comment,
                self.created_at
            ],
        )?;
        Ok(())
    }
}

fn millis_to_datetime(millis: i64, record_id: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        StoreError::MalformedRecord(format!(
            "record {} has out-of-range timestamp {}",
            record_id, millis
        ))
    })
}

/// Quote every whitespace-separated term and OR them together.
fn escape_fts_query(query: &str) -> String {
    query
        .split_whitespace()
        .map(|w| w.replace('"', ""))
        .filter(|w| !w.is_empty())
        .map(|w| format!("\"{}\"", w))
        .collect::<Vec<_>>()
        .join(" OR ")
}
