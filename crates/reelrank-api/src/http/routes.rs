//! HTTP route definitions.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::http::{activity, monitoring, search};
use crate::state::AppState;

/// Build the full router.
///
/// ```text
/// /movies
///   GET /movies/search/basic?query=  - Store full-text relevance
///   GET /movies/search/hybrid?query= - Title semantic + lexical
///   GET /movies/search?query=        - Semantic + rating + popularity
///   GET /movies/top-watched?limit=   - Most watched in the activity window
///   GET /movies/{id}/reviews         - Reviews for one item
///
/// /users
///   GET /users/{id}/history          - Watch events, newest first
///
/// /health - Catalog and cache status
/// /livez  - Liveness probe
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    let movie_routes = Router::new()
        .route("/search", get(search::search_ranked))
        .route("/search/basic", get(search::search_basic))
        .route("/search/hybrid", get(search::search_hybrid))
        .route("/top-watched", get(activity::top_watched))
        .route("/{id}/reviews", get(activity::item_reviews))
        .with_state(state.clone());

    let user_routes = Router::new()
        .route("/{id}/history", get(activity::user_history))
        .with_state(state.clone());

    let monitoring_routes = Router::new()
        .route("/health", get(monitoring::health))
        .with_state(state);

    // Liveness probe has no state dependency
    let liveness_route = Router::new().route("/livez", get(monitoring::liveness_probe));

    Router::new()
        .nest("/movies", movie_routes)
        .nest("/users", user_routes)
        .merge(monitoring_routes)
        .merge(liveness_route)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
