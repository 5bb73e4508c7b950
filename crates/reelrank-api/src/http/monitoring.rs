//! Monitoring and health check handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub requests_served: u64,
    /// Catalog size, absent when the store could not be reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<usize>,
    pub embedding_model: String,
    pub embedding_cache_entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let (status, items, message) = match state.catalog.item_count().await {
        Ok(count) => (HealthStatus::Healthy, Some(count), None),
        Err(e) => (HealthStatus::Unhealthy, None, Some(e.to_string())),
    };

    let code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.uptime().as_secs(),
            requests_served: state.request_count(),
            items,
            embedding_model: state.engine.embedder().model_id().to_string(),
            embedding_cache_entries: state.cache().len(),
            message,
        }),
    )
}

/// Liveness probe.
pub async fn liveness_probe() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serialize() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
    }

    #[test]
    fn test_health_response_skips_missing_fields() {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            version: "0.1.0".to_string(),
            uptime_seconds: 3,
            requests_served: 0,
            items: None,
            embedding_model: "hash-bow-v1".to_string(),
            embedding_cache_entries: 0,
            message: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("items"));
        assert!(!json.contains("message"));
        assert!(json.contains("hash-bow-v1"));
    }

    #[tokio::test]
    async fn test_liveness_probe() {
        let Json(body) = liveness_probe().await;
        assert_eq!(body["status"], "alive");
    }
}
