//! Search handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use tracing::info;

use reelrank_protocols::ScoredCandidate;
use reelrank_ranking::{RankingRequest, SearchMode};

use crate::error::ApiError;
use crate::state::AppState;

/// Query string of every search endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// One ranked item as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemView {
    pub id: String,
    pub title: String,
    pub director: String,
    pub cast: Vec<String>,
    pub release_year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    pub score: f32,
}

impl From<ScoredCandidate> for ItemView {
    fn from(candidate: ScoredCandidate) -> Self {
        let item = candidate.item;
        Self {
            id: item.id.into_inner(),
            title: item.title,
            director: item.director,
            cast: item.cast,
            release_year: item.release_year,
            rating: item.rating,
            score: candidate.score,
        }
    }
}

/// `GET /movies/search/basic`
pub async fn search_basic(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ItemView>>, ApiError> {
    run_search(&state, params, SearchMode::Basic).await
}

/// `GET /movies/search/hybrid`
pub async fn search_hybrid(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ItemView>>, ApiError> {
    run_search(&state, params, SearchMode::Hybrid).await
}

/// `GET /movies/search`
pub async fn search_ranked(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ItemView>>, ApiError> {
    run_search(&state, params, SearchMode::Ranked).await
}

async fn run_search(
    state: &AppState,
    params: SearchParams,
    mode: SearchMode,
) -> Result<Json<Vec<ItemView>>, ApiError> {
    state.increment_requests();
    let request = RankingRequest::new(params.query.unwrap_or_default(), mode);
    let results = state.engine.rank(&request).await?;

    info!(
        mode = %mode,
        query = %request.query,
        results = results.len(),
        "Search served"
    );
    Ok(Json(results.into_iter().map(ItemView::from).collect()))
}
