//! Ranking engine.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt, stream};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, warn};

use reelrank_config::RankingConfig;
use reelrank_protocols::{
    Catalog, Embedding, EmbeddingProvider, EventLog, Item, RankingError, ScoredCandidate,
    SignalBreakdown,
};

use crate::basic::{basic_search, validate_query};
use crate::cache::EmbeddingCache;
use crate::fusion::{fuse_hybrid, fuse_ranked, select_top_k};
use crate::scorers::{
    lexical_overlap, popularity_score, rating_score, semantic_similarity, window_start,
};

/// Which signals a ranking pass fuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Store full-text relevance only.
    Basic,
    /// Title semantic similarity plus title lexical overlap.
    Hybrid,
    /// Title semantic similarity plus rating plus recent popularity.
    Ranked,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Hybrid => "hybrid",
            Self::Ranked => "ranked",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "hybrid" => Ok(Self::Hybrid),
            "ranked" => Ok(Self::Ranked),
            other => Err(format!(
                "unknown search mode '{}', expected basic, hybrid or ranked",
                other
            )),
        }
    }
}

/// One ranking pass.
#[derive(Debug, Clone)]
pub struct RankingRequest {
    pub query: String,
    pub mode: SearchMode,
    /// Reference time for the popularity window.
    pub as_of: DateTime<Utc>,
}

impl RankingRequest {
    pub fn new(query: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            query: query.into(),
            mode,
            as_of: Utc::now(),
        }
    }

    pub fn with_as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = as_of;
        self
    }
}

/// Fuses relevance signals over the whole catalog.
///
/// Collaborators are injected once and shared across requests. The engine
/// itself holds no per-request state; the embedding cache only memoizes
/// provider output.
pub struct RankingEngine {
    catalog: Arc<dyn Catalog>,
    events: Arc<dyn EventLog>,
    embedder: Arc<dyn EmbeddingProvider>,
    cache: Arc<EmbeddingCache>,
    config: RankingConfig,
}

impl RankingEngine {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        events: Arc<dyn EventLog>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: RankingConfig,
    ) -> Self {
        Self {
            catalog,
            events,
            embedder,
            cache: Arc::new(EmbeddingCache::new()),
            config,
        }
    }

    /// Share an existing cache instead of the engine's own.
    pub fn with_cache(mut self, cache: Arc<EmbeddingCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &Arc<EmbeddingCache> {
        &self.cache
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Embed every catalog title that has no fresh cache entry.
    pub async fn warm_cache(&self) -> Result<usize, RankingError> {
        let items = self.catalog.fetch_all_items().await?;
        Ok(self.cache.warm(&items, self.embedder.as_ref()).await?)
    }

    /// Run one ranking pass.
    ///
    /// Fails as a whole: no partial ranking is ever returned.
    pub async fn rank(&self, request: &RankingRequest) -> Result<Vec<ScoredCandidate>, RankingError> {
        let outcome = self.run_pass(request).await;
        if let Err(ref e) = outcome {
            if e.is_client_error() {
                debug!(mode = %request.mode, "Ranking request rejected: {}", e);
            } else {
                warn!(mode = %request.mode, "Ranking pass failed: {}", e);
            }
        }
        outcome
    }

    async fn run_pass(&self, request: &RankingRequest) -> Result<Vec<ScoredCandidate>, RankingError> {
        let query = validate_query(&request.query)?;
        let started = Instant::now();
        let deadline = self
            .config
            .deadline_ms
            .map(|ms| started + Duration::from_millis(ms));

        let results = match request.mode {
            SearchMode::Basic => {
                check_deadline(deadline)?;
                basic_search(self.catalog.as_ref(), query).await?
            }
            SearchMode::Hybrid | SearchMode::Ranked => {
                self.rank_fused(query, request.mode, request.as_of, deadline)
                    .await?
            }
        };

        debug!(
            mode = %request.mode,
            returned = results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Ranking pass complete"
        );
        Ok(results)
    }

    async fn rank_fused(
        &self,
        query: &str,
        mode: SearchMode,
        as_of: DateTime<Utc>,
        deadline: Option<Instant>,
    ) -> Result<Vec<ScoredCandidate>, RankingError> {
        // Only ranked mode reads the event log; hybrid never looks at `since`.
        let since = match mode {
            SearchMode::Ranked => window_start(as_of, self.config.popularity_window_days)?,
            _ => as_of,
        };
        check_deadline(deadline)?;
        let items = self.catalog.fetch_all_items().await?;
        if items.is_empty() {
            return Ok(vec![]);
        }
        check_deadline(deadline)?;

        let query_embedding = self.embedder.embed(query).await?;
        if query_embedding.is_zero() {
            warn!("Query '{}' embedded to a zero vector, semantic scores are 0", query);
        }
        let candidate_count = items.len();

        let scored: Vec<ScoredCandidate> = stream::iter(items)
            .map(|item| self.score_candidate(item, mode, query, &query_embedding, since, deadline))
            .buffered(self.config.max_concurrency.max(1))
            .try_collect()
            .await?;

        debug!(
            "Scored {} candidates for '{}' in {} mode",
            candidate_count, query, mode
        );
        Ok(select_top_k(scored, self.config.top_k))
    }

    async fn score_candidate(
        &self,
        item: Item,
        mode: SearchMode,
        query: &str,
        query_embedding: &Embedding,
        since: DateTime<Utc>,
        deadline: Option<Instant>,
    ) -> Result<ScoredCandidate, RankingError> {
        check_deadline(deadline)?;

        let item_embedding = self
            .cache
            .get_or_embed(&item, self.embedder.as_ref())
            .await?;
        let semantic = semantic_similarity(query_embedding, &item_embedding)?;

        let (score, signals) = match mode {
            SearchMode::Ranked => {
                let count = self.events.count_events(&item.id, since).await?;
                let popularity = popularity_score(count, self.config.popularity_saturation);
                let rating = rating_score(
                    &item,
                    self.config.rating_scale,
                    self.config.clamp_rating,
                );
                let score = fuse_ranked(semantic, rating, popularity, &self.config.ranked);
                let signals = SignalBreakdown {
                    semantic: Some(semantic),
                    rating: Some(rating),
                    popularity: Some(popularity),
                    ..Default::default()
                };
                (score, signals)
            }
            _ => {
                let lexical = lexical_overlap(query, &item.title);
                let score = fuse_hybrid(semantic, lexical, &self.config.hybrid);
                let signals = SignalBreakdown {
                    semantic: Some(semantic),
                    lexical: Some(lexical),
                    ..Default::default()
                };
                (score, signals)
            }
        };

        Ok(ScoredCandidate::new(item, score, signals))
    }
}

fn check_deadline(deadline: Option<Instant>) -> Result<(), RankingError> {
    match deadline {
        Some(deadline) if Instant::now() >= deadline => Err(RankingError::DeadlineExceeded),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
