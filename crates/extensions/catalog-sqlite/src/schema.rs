//! Database schema management.

use rusqlite::Connection;
use tokio_rusqlite::Error;

/// Create tables, indexes and FTS triggers if they do not exist yet.
pub fn init_schema(conn: &Connection) -> Result<(), Error> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

const SCHEMA: &str = r#"
-- Catalog items. cast_json keeps billing order, cast_text feeds the FTS index.
CREATE TABLE IF NOT EXISTS items (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    director TEXT NOT NULL DEFAULT '',
    cast_json TEXT NOT NULL DEFAULT '[]',
    cast_text TEXT NOT NULL DEFAULT '',
    release_year INTEGER NOT NULL DEFAULT 0,
    rating REAL
);

-- Append-only watch log. Timestamps are unix milliseconds.
CREATE TABLE IF NOT EXISTS watch_history (
    id TEXT PRIMARY KEY,
    item_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    watched_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS reviews (
    id TEXT PRIMARY KEY,
    item_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    rating REAL,
    comment TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_watch_item_time ON watch_history(item_id, watched_at);
CREATE INDEX IF NOT EXISTS idx_watch_time ON watch_history(watched_at);
CREATE INDEX IF NOT EXISTS idx_watch_user ON watch_history(user_id);
CREATE INDEX IF NOT EXISTS idx_reviews_item ON reviews(item_id);

-- Full-text index over the item's text fields
CREATE VIRTUAL TABLE IF NOT EXISTS items_fts USING fts5(
    title,
    director,
    cast_text,
    content=items,
    content_rowid=rowid
);

CREATE TRIGGER IF NOT EXISTS items_ai AFTER INSERT ON items BEGIN
    INSERT INTO items_fts(rowid, title, director, cast_text)
    VALUES (new.rowid, new.title, new.director, new.cast_text);
END;

CREATE TRIGGER IF NOT EXISTS items_ad AFTER DELETE ON items BEGIN
    INSERT INTO items_fts(items_fts, rowid, title, director, cast_text)
    VALUES ('delete', old.rowid, old.title, old.director, old.cast_text);
END;

CREATE TRIGGER IF NOT EXISTS items_au AFTER UPDATE ON items BEGIN
    INSERT INTO items_fts(items_fts, rowid, title, director, cast_text)
    VALUES ('delete', old.rowid, old.title, old.director, old.cast_text);
    INSERT INTO items_fts(rowid, title, director, cast_text)
    VALUES (new.rowid, new.title, new.director, new.cast_text);
END;
"#;
