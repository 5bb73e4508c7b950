//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

mod schema_ranking;

pub use schema_ranking::*;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub ranking: RankingConfig,

    #[serde(default)]
    pub activity: ActivityConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Catalog store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// SQLite database path. `:memory:` keeps everything in process.
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

fn default_catalog_path() -> String {
    "~/.reelrank/catalog.db".to_string()
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider type ("hash" or "openai").
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            base_url: None,
            api_key: None,
            dimension: default_dimension(),
        }
    }
}

fn default_provider() -> String {
    "hash".to_string()
}

fn default_dimension() -> usize {
    384
}

/// Watch activity reporting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    /// Look-back window for "top watched", in days.
    #[serde(default = "default_activity_window")]
    pub window_days: i64,

    #[serde(default = "default_top_watched_limit")]
    pub top_watched_limit: usize,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            window_days: default_activity_window(),
            top_watched_limit: default_top_watched_limit(),
        }
    }
}

fn default_activity_window() -> i64 {
    30
}

fn default_top_watched_limit() -> usize {
    5
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
