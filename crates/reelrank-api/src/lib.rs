//! # ReelRank API
//!
//! HTTP surface for the ranking engine and the catalog's activity views.
//!
//! ```text
//! GET /movies/search/basic?query=   store full-text relevance
//! GET /movies/search/hybrid?query=  title semantic + lexical fusion
//! GET /movies/search?query=         semantic + rating + popularity fusion
//! GET /movies/top-watched           most watched in the activity window
//! GET /movies/{id}/reviews          reviews for one item
//! GET /users/{id}/history           watch events for one user
//! GET /health, /livez               probes
//! ```

pub mod error;
pub mod http;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use http::routes::create_router;
pub use server::{ApiConfig, ApiServer, ServerError};
pub use state::AppState;
