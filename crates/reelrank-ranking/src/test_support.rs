//! Hand-written collaborators for engine tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use reelrank_protocols::{
    Catalog, Embedding, EmbeddingError, EmbeddingProvider, EventLog, Item, ItemId, Review,
    StoreError, UserId, WatchCount, WatchEvent,
};

pub struct MockCatalog {
    items: Mutex<Vec<Item>>,
    search_results: Vec<(Item, f32)>,
    fail: bool,
    pub calls: AtomicUsize,
}

impl MockCatalog {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items: Mutex::new(items),
            search_results: Vec::new(),
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_search_results(mut self, results: Vec<(Item, f32)>) -> Self {
        self.search_results = results;
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(vec![])
        }
    }

    pub fn rename(&self, id: &str, title: &str) {
        for item in self.items.lock().iter_mut() {
            if item.id.as_str() == id {
                item.title = title.to_string();
            }
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StoreError::ConnectionError("catalog offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn fetch_all_items(&self) -> Result<Vec<Item>, StoreError> {
        self.record()?;
        Ok(self.items.lock().clone())
    }

    async fn get_item(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        self.record()?;
        Ok(self.items.lock().iter().find(|i| &i.id == id).cloned())
    }

    async fn text_search(&self, _query: &str) -> Result<Vec<(Item, f32)>, StoreError> {
        self.record()?;
        Ok(self.search_results.clone())
    }

    async fn reviews_for_item(&self, _id: &ItemId) -> Result<Vec<Review>, StoreError> {
        self.record()?;
        Ok(vec![])
    }

    async fn item_count(&self) -> Result<usize, StoreError> {
        self.record()?;
        Ok(self.items.lock().len())
    }
}

pub struct MockEventLog {
    counts: HashMap<String, u64>,
    fail: bool,
    pub calls: AtomicUsize,
    pub last_since: Mutex<Option<DateTime<Utc>>>,
}

impl MockEventLog {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            fail: false,
            calls: AtomicUsize::new(0),
            last_since: Mutex::new(None),
        }
    }

    pub fn with_count(mut self, id: &str, count: u64) -> Self {
        self.counts.insert(id.to_string(), count);
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventLog for MockEventLog {
    async fn count_events(&self, item: &ItemId, since: DateTime<Utc>) -> Result<u64, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_since.lock() = Some(since);
        if self.fail {
            return Err(StoreError::QueryError("event log offline".to_string()));
        }
        Ok(self.counts.get(item.as_str()).copied().unwrap_or(0))
    }

    async fn top_watched(
        &self,
        _since: DateTime<Utc>,
        _limit: usize,
    ) -> Result<Vec<WatchCount>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![])
    }

    async fn user_history(&self, _user: &UserId) -> Result<Vec<WatchEvent>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![])
    }
}

/// Bag-of-words embedder over 8 buckets keyed by the byte sum of each token.
pub struct MockEmbedder {
    model: String,
    dimension: usize,
    fail: bool,
    delays: HashMap<String, Duration>,
    pub texts: Mutex<Vec<String>>,
    pub batch_calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            model: "mock-v1".to_string(),
            dimension: 8,
            fail: false,
            delays: HashMap::new(),
            texts: Mutex::new(Vec::new()),
            batch_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_delay(mut self, text: &str, delay: Duration) -> Self {
        self.delays.insert(text.to_string(), delay);
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn embed_count(&self) -> usize {
        self.texts.lock().len()
    }

    pub fn count_of(&self, text: &str) -> usize {
        self.texts.lock().iter().filter(|t| t.as_str() == text).count()
    }

    pub fn vector_for(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0f32; self.dimension];
        for token in text.split_whitespace() {
            let sum: usize = token.to_lowercase().bytes().map(usize::from).sum();
            vector[sum % self.dimension] += 1.0;
        }
        Embedding::new(vector)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.texts.lock().push(text.to_string());
        if let Some(delay) = self.delays.get(text) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail {
            return Err(EmbeddingError::Failed("model unavailable".to_string()));
        }
        Ok(self.vector_for(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EmbeddingError::Failed("model unavailable".to_string()));
        }
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Embedder that returns a vector of the wrong length for one text.
pub struct RaggedEmbedder {
    pub short_for: String,
}

#[async_trait]
impl EmbeddingProvider for RaggedEmbedder {
    fn model_id(&self) -> &str {
        "ragged"
    }

    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        if text == self.short_for {
            Ok(Embedding::new(vec![1.0, 0.0]))
        } else {
            Ok(Embedding::new(vec![1.0, 0.0, 0.0]))
        }
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        3
    }
}
