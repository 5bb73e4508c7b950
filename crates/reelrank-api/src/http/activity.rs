//! Watch activity and review handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::Utc;
use serde::Deserialize;

use reelrank_protocols::{ItemId, Review, UserId, WatchCount, WatchEvent};
use reelrank_ranking::scorers::window_start;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TopWatchedParams {
    pub limit: Option<usize>,
}

/// `GET /movies/top-watched`
pub async fn top_watched(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopWatchedParams>,
) -> Result<Json<Vec<WatchCount>>, ApiError> {
    state.increment_requests();
    let limit = params.limit.unwrap_or(state.activity.top_watched_limit);
    if limit == 0 {
        return Err(ApiError::Validation("limit must be positive".to_string()));
    }

    let since = window_start(Utc::now(), state.activity.window_days)?;
    let rows = state.events.top_watched(since, limit).await?;
    Ok(Json(rows))
}

/// `GET /users/{id}/history`
pub async fn user_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<WatchEvent>>, ApiError> {
    state.increment_requests();
    let history = state.events.user_history(&UserId::new(id)).await?;
    Ok(Json(history))
}

/// `GET /movies/{id}/reviews`
///
/// Unknown items are a 404; a known item without reviews is an empty list.
pub async fn item_reviews(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError> {
    state.increment_requests();
    let id = ItemId::new(id);
    if state.catalog.get_item(&id).await?.is_none() {
        return Err(ApiError::NotFound(format!("item {}", id)));
    }
    let reviews = state.catalog.reviews_for_item(&id).await?;
    Ok(Json(reviews))
}
