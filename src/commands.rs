//! One-shot CLI commands and the component wiring they share with `serve`.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use reelrank_catalog_sqlite::{CatalogFixture, ImportSummary, SqliteCatalog};
use reelrank_config::{CatalogConfig, Config, ConfigLoader};
use reelrank_embedding::provider_from_config;
use reelrank_protocols::{EventLog, ScoredCandidate, WatchCount};
use reelrank_ranking::scorers::window_start;
use reelrank_ranking::{RankingEngine, RankingRequest, SearchMode};

const IN_MEMORY: &str = ":memory:";

/// Open the configured SQLite catalog, creating parent directories as needed.
pub(crate) async fn open_catalog(
    config: &CatalogConfig,
) -> Result<Arc<SqliteCatalog>, Box<dyn std::error::Error>> {
    if config.path == IN_MEMORY {
        return Ok(Arc::new(SqliteCatalog::in_memory().await?));
    }

    let path = ConfigLoader::expand_path(&config.path);
    let path = Path::new(&path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    info!("Opening catalog at {}", path.display());
    Ok(Arc::new(SqliteCatalog::open(path).await?))
}

/// Wire the ranking engine over one catalog handle.
pub(crate) fn build_engine(
    config: &Config,
    catalog: Arc<SqliteCatalog>,
) -> Result<RankingEngine, Box<dyn std::error::Error>> {
    let embedder = provider_from_config(&config.embedding)?;
    Ok(RankingEngine::new(
        catalog.clone(),
        catalog,
        embedder,
        config.ranking.clone(),
    ))
}

pub(crate) async fn run_import(
    config: &Config,
    file: &Path,
) -> Result<ImportSummary, Box<dyn std::error::Error>> {
    let fixture = CatalogFixture::from_file(file).await?;
    let catalog = open_catalog(&config.catalog).await?;
    let summary = catalog.import_fixture(fixture).await?;
    println!(
        "Imported {} items, {} watch events, {} reviews from {}",
        summary.items,
        summary.watch_events,
        summary.reviews,
        file.display()
    );
    Ok(summary)
}

pub(crate) async fn run_search(
    config: &Config,
    query: &str,
    mode: SearchMode,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = open_catalog(&config.catalog).await?;
    let engine = build_engine(config, catalog)?;
    let results = engine.rank(&RankingRequest::new(query, mode)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", format_results(&results));
    }
    Ok(())
}

pub(crate) async fn run_top_watched(
    config: &Config,
    limit: Option<usize>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let limit = limit.unwrap_or(config.activity.top_watched_limit);
    if limit == 0 {
        return Err("limit must be greater than zero".into());
    }

    let catalog = open_catalog(&config.catalog).await?;
    let since = window_start(Utc::now(), config.activity.window_days)?;
    let rows = catalog.top_watched(since, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", format_watch_counts(&rows));
    }
    Ok(())
}

fn format_results(results: &[ScoredCandidate]) -> String {
    if results.is_empty() {
        return "No matches.\n".to_string();
    }
    results
        .iter()
        .enumerate()
        .map(|(rank, c)| {
            format!(
                "{:>2}. {} ({})  score={:.4}  id={}\n",
                rank + 1,
                c.item.title,
                c.item.release_year,
                c.score,
                c.item.id
            )
        })
        .collect()
}

fn format_watch_counts(rows: &[WatchCount]) -> String {
    if rows.is_empty() {
        return "No watch activity in window.\n".to_string();
    }
    rows.iter()
        .map(|r| format!("{:>5}  {} ({})\n", r.watch_count, r.title, r.release_year))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelrank_protocols::{Catalog, Item, SignalBreakdown};
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn config_with_db(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.catalog.path = dir
            .path()
            .join("nested")
            .join("catalog.db")
            .to_string_lossy()
            .to_string();
        config
    }

    #[tokio::test]
    async fn test_open_catalog_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let config = config_with_db(&dir);
        open_catalog(&config.catalog).await.unwrap();
        assert!(dir.path().join("nested").join("catalog.db").exists());
    }

    #[tokio::test]
    async fn test_open_in_memory_catalog() {
        let config = CatalogConfig {
            path: ":memory:".to_string(),
        };
        let catalog = open_catalog(&config).await.unwrap();
        assert_eq!(catalog.item_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_import_then_search() {
        let dir = TempDir::new().unwrap();
        let config = config_with_db(&dir);

        let mut fixture = NamedTempFile::new().unwrap();
        write!(
            fixture,
            r#"{{"items": [
                {{"id": "m1", "title": "Heat", "release_year": 1995, "rating": 8.3}},
                {{"id": "m2", "title": "Alien", "release_year": 1979, "rating": 8.5}}
            ]}}"#
        )
        .unwrap();

        let summary = run_import(&config, fixture.path()).await.unwrap();
        assert_eq!(summary.items, 2);

        let catalog = open_catalog(&config.catalog).await.unwrap();
        let engine = build_engine(&config, catalog).unwrap();
        let results = engine
            .rank(&RankingRequest::new("alien", SearchMode::Hybrid))
            .await
            .unwrap();
        assert_eq!(results[0].item.id.as_str(), "m2");
    }

    #[tokio::test]
    async fn test_top_watched_rejects_zero_limit() {
        let dir = TempDir::new().unwrap();
        let config = config_with_db(&dir);
        assert!(run_top_watched(&config, Some(0), false).await.is_err());
    }

    #[tokio::test]
    async fn test_build_engine_rejects_unknown_provider() {
        let mut config = Config::default();
        config.embedding.provider = "word2vec".to_string();
        let catalog = Arc::new(SqliteCatalog::in_memory().await.unwrap());
        assert!(build_engine(&config, catalog).is_err());
    }

    #[tokio::test]
    async fn test_top_watched_out_of_range_window_is_error() {
        let dir = TempDir::new().unwrap();
        let mut config = config_with_db(&dir);
        config.activity.window_days = 200_000_000_000;
        assert!(run_top_watched(&config, None, true).await.is_err());
    }

    #[test]
    fn test_format_results() {
        let results = vec![ScoredCandidate::new(
            Item::new("m1", "Heat").with_release_year(1995),
            0.5,
            SignalBreakdown::default(),
        )];
        let out = format_results(&results);
        assert!(out.starts_with(" 1. Heat (1995)"));
        assert!(out.contains("score=0.5000"));
        assert!(out.contains("id=m1"));
        assert_eq!(format_results(&[]), "No matches.\n");
    }
}
