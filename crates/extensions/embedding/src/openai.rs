//! OpenAI-compatible embedding provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use reelrank_protocols::{Embedding, EmbeddingError, EmbeddingProvider};

/// Configuration for OpenAI embeddings.
#[derive(Debug, Clone)]
pub struct OpenAIEmbeddingConfig {
    /// Bearer token sent with every request.
    pub api_key: String,
    /// Model name, also used as the cache model id.
    pub model: String,
    /// Base URL up to and excluding `/embeddings`.
    pub base_url: String,
    /// Expected vector length.
    pub dimension: usize,
}

impl OpenAIEmbeddingConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "text-embedding-3-small".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            dimension: 1536,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at a compatible server (Azure OpenAI, a local gateway, ...).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_dimension(mut self, dim: usize) -> Self {
        self.dimension = dim;
        self
    }
}

/// Embedding provider backed by an `/embeddings` HTTP endpoint.
pub struct OpenAIEmbedding {
    client: reqwest::Client,
    config: OpenAIEmbeddingConfig,
}

impl OpenAIEmbedding {
    pub fn new(config: OpenAIEmbeddingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_api_key(api_key: impl Into<String>) -> Self {
        Self::new(OpenAIEmbeddingConfig::new(api_key))
    }

    fn check_dimension(&self, embedding: &Embedding) -> Result<(), EmbeddingError> {
        if embedding.dimension != self.config.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.config.dimension,
                actual: embedding.dimension,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [&'a str],
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbedding {
    fn model_id(&self) -> &str {
        &self.config.model
    }

    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let embeddings = self.embed_batch(&[text]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Failed("Empty response".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let request = EmbeddingRequest {
            input: texts,
            model: &self.config.model,
        };

        let url = format!("{}/embeddings", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingError::Failed(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EmbeddingError::Failed(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Failed(format!("Parse error: {}", e)))?;

        if parsed.data.len() != texts.len() {
            return Err(EmbeddingError::Failed(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        let embeddings: Vec<Embedding> = parsed
            .data
            .into_iter()
            .map(|d| Embedding::new(d.embedding))
            .collect();
        for embedding in &embeddings {
            self.check_dimension(embedding)?;
        }

        debug!(
            model = %self.config.model,
            "Generated {} embeddings",
            embeddings.len()
        );

        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }
}

#[cfg(test)]
#[path = "openai_tests.rs"]
mod tests;
