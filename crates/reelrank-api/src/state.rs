//! Application state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use reelrank_config::ActivityConfig;
use reelrank_protocols::{Catalog, EventLog};
use reelrank_ranking::{EmbeddingCache, RankingEngine};

/// Shared across handlers. Built once at startup.
pub struct AppState {
    pub engine: Arc<RankingEngine>,
    pub catalog: Arc<dyn Catalog>,
    pub events: Arc<dyn EventLog>,
    pub activity: ActivityConfig,
    start_time: Instant,
    request_count: AtomicU64,
}

impl AppState {
    pub fn new(
        engine: Arc<RankingEngine>,
        catalog: Arc<dyn Catalog>,
        events: Arc<dyn EventLog>,
        activity: ActivityConfig,
    ) -> Self {
        Self {
            engine,
            catalog,
            events,
            activity,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    pub fn cache(&self) -> &Arc<EmbeddingCache> {
        self.engine.cache()
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn increment_requests(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }
}
