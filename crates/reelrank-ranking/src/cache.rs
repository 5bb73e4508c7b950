//! Item embedding cache.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use reelrank_protocols::{Embedding, EmbeddingError, EmbeddingProvider, Item, ItemId};

struct CachedEmbedding {
    /// Title the vector was computed from.
    title: String,
    embedding: Arc<Embedding>,
}

/// Title embeddings keyed by item id and model id.
///
/// An entry whose recorded title differs from the item's current title is
/// stale and gets recomputed on the next lookup.
#[derive(Default)]
pub struct EmbeddingCache {
    entries: RwLock<HashMap<(ItemId, String), CachedEmbedding>>,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached vector for the item's current title, if any.
    pub fn get(&self, item: &Item, model_id: &str) -> Option<Arc<Embedding>> {
        let entries = self.entries.read();
        entries
            .get(&(item.id.clone(), model_id.to_string()))
            .filter(|cached| cached.title == item.title)
            .map(|cached| cached.embedding.clone())
    }

    pub fn insert(&self, item: &Item, model_id: &str, embedding: Embedding) -> Arc<Embedding> {
        let embedding = Arc::new(embedding);
        self.entries.write().insert(
            (item.id.clone(), model_id.to_string()),
            CachedEmbedding {
                title: item.title.clone(),
                embedding: embedding.clone(),
            },
        );
        embedding
    }

    /// Return the cached title vector or embed the title and cache it.
    pub async fn get_or_embed(
        &self,
        item: &Item,
        provider: &dyn EmbeddingProvider,
    ) -> Result<Arc<Embedding>, EmbeddingError> {
        if let Some(hit) = self.get(item, provider.model_id()) {
            return Ok(hit);
        }

        debug!("Embedding cache miss for item {}", item.id);
        let embedding = provider.embed(&item.title).await?;
        Ok(self.insert(item, provider.model_id(), embedding))
    }

    /// Embed every item without a fresh entry in one batch call.
    ///
    /// Returns the number of entries written.
    pub async fn warm(
        &self,
        items: &[Item],
        provider: &dyn EmbeddingProvider,
    ) -> Result<usize, EmbeddingError> {
        let missing: Vec<&Item> = items
            .iter()
            .filter(|item| self.get(item, provider.model_id()).is_none())
            .collect();
        if missing.is_empty() {
            return Ok(0);
        }

        let titles: Vec<&str> = missing.iter().map(|item| item.title.as_str()).collect();
        let embeddings = provider.embed_batch(&titles).await?;
        if embeddings.len() != missing.len() {
            return Err(EmbeddingError::Failed(format!(
                "Expected {} embeddings, got {}",
                missing.len(),
                embeddings.len()
            )));
        }

        for (item, embedding) in missing.iter().zip(embeddings) {
            self.insert(item, provider.model_id(), embedding);
        }

        info!(
            "Warmed embedding cache with {} items (model {})",
            missing.len(),
            provider.model_id()
        );
        Ok(missing.len())
    }

    /// Drop every entry for an item, across all models.
    pub fn invalidate(&self, id: &ItemId) {
        self.entries.write().retain(|(item_id, _), _| item_id != id);
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
