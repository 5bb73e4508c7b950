//! Embedding providers for ReelRank.
//!
//! - [`HashEmbedding`] runs offline and is fully deterministic.
//! - [`OpenAIEmbedding`] talks to any OpenAI-compatible `/embeddings` endpoint.

mod hash;
mod openai;

use std::sync::Arc;

use reelrank_config::{ConfigError, EmbeddingConfig};
use reelrank_protocols::EmbeddingProvider;
use tracing::info;

pub use hash::{HASH_MODEL_ID, HashEmbedding};
pub use openai::{OpenAIEmbedding, OpenAIEmbeddingConfig};

/// Build the provider selected by `[embedding]`.
pub fn provider_from_config(
    config: &EmbeddingConfig,
) -> Result<Arc<dyn EmbeddingProvider>, ConfigError> {
    let provider: Arc<dyn EmbeddingProvider> = match config.provider.as_str() {
        "hash" => Arc::new(HashEmbedding::new(config.dimension)),
        "openai" => {
            let mut openai = OpenAIEmbeddingConfig::new(config.api_key.clone().unwrap_or_default())
                .with_dimension(config.dimension);
            if let Some(ref model) = config.model {
                openai = openai.with_model(model);
            }
            if let Some(ref url) = config.base_url {
                openai = openai.with_base_url(url);
            }
            Arc::new(OpenAIEmbedding::new(openai))
        }
        other => {
            return Err(ConfigError::invalid_value(
                "embedding.provider",
                format!("unknown provider '{}'", other),
            ));
        }
    };

    info!(
        "Embedding provider: {} (dimension {})",
        provider.model_id(),
        provider.dimension()
    );
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_builds_hash_provider() {
        let provider = provider_from_config(&EmbeddingConfig::default()).unwrap();
        assert_eq!(provider.model_id(), HASH_MODEL_ID);
        assert_eq!(provider.dimension(), 384);
    }

    #[test]
    fn test_openai_config_uses_model_name() {
        let config = EmbeddingConfig {
            provider: "openai".to_string(),
            model: Some("text-embedding-3-large".to_string()),
            base_url: Some("http://localhost:9999/v1".to_string()),
            api_key: Some("key".to_string()),
            dimension: 3072,
        };
        let provider = provider_from_config(&config).unwrap();
        assert_eq!(provider.model_id(), "text-embedding-3-large");
        assert_eq!(provider.dimension(), 3072);
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let config = EmbeddingConfig {
            provider: "glove".to_string(),
            ..Default::default()
        };
        assert!(provider_from_config(&config).is_err());
    }
}
