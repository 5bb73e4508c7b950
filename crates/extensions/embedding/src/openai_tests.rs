use super::*;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer, dimension: usize) -> OpenAIEmbedding {
    OpenAIEmbedding::new(
        OpenAIEmbeddingConfig::new("test-key")
            .with_base_url(format!("{}/v1", server.uri()))
            .with_dimension(dimension),
    )
}

#[test]
fn test_config_defaults() {
    let config = OpenAIEmbeddingConfig::new("test-key");
    assert_eq!(config.api_key, "test-key");
    assert_eq!(config.model, "text-embedding-3-small");
    assert_eq!(config.dimension, 1536);
}

#[test]
fn test_config_builder_trims_trailing_slash() {
    let config = OpenAIEmbeddingConfig::new("key")
        .with_model("text-embedding-3-large")
        .with_dimension(3072)
        .with_base_url("https://custom.api.com/v1/");

    assert_eq!(config.model, "text-embedding-3-large");
    assert_eq!(config.dimension, 3072);
    assert_eq!(config.base_url, "https://custom.api.com/v1");
}

#[test]
fn test_model_id_is_model_name() {
    let provider = OpenAIEmbedding::from_api_key("test-key");
    assert_eq!(provider.model_id(), "text-embedding-3-small");
    assert_eq!(provider.dimension(), 1536);
}

#[tokio::test]
async fn test_embed_batch_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "text-embedding-3-small",
            "input": ["heat", "alien"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {"embedding": [1.0, 0.0, 0.0]},
                {"embedding": [0.0, 1.0, 0.0]}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, 3);
    let embeddings = provider.embed_batch(&["heat", "alien"]).await.unwrap();
    assert_eq!(embeddings.len(), 2);
    assert_eq!(embeddings[0].vector, vec![1.0, 0.0, 0.0]);
    assert_eq!(embeddings[1].vector, vec![0.0, 1.0, 0.0]);
}

#[tokio::test]
async fn test_embed_single() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"embedding": [0.6, 0.8]}]
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server, 2);
    let embedding = provider.embed("heat").await.unwrap();
    assert_eq!(embedding.dimension, 2);
}

#[tokio::test]
async fn test_api_error_is_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"error":{"message":"Invalid API key"}}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, 3);
    match provider.embed("heat").await {
        Err(EmbeddingError::Failed(message)) => {
            assert!(message.contains("401"));
            assert!(message.contains("Invalid API key"));
        }
        other => panic!("Expected Failed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider = provider_for(&server, 3);
    let result = provider.embed("heat").await;
    assert!(matches!(result, Err(EmbeddingError::Failed(_))));
}

#[tokio::test]
async fn test_wrong_dimension_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"embedding": [1.0, 0.0]}]
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server, 3);
    let result = provider.embed("heat").await;
    assert!(matches!(
        result,
        Err(EmbeddingError::DimensionMismatch {
            expected: 3,
            actual: 2
        })
    ));
}

#[tokio::test]
async fn test_missing_vectors_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"embedding": [1.0, 0.0, 0.0]}]
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server, 3);
    let result = provider.embed_batch(&["heat", "alien"]).await;
    assert!(matches!(result, Err(EmbeddingError::Failed(_))));
}

#[tokio::test]
async fn test_empty_batch_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let provider = provider_for(&server, 3);
    let embeddings = provider.embed_batch(&[]).await.unwrap();
    assert!(embeddings.is_empty());
}
