//! HTTP interface module.
//!
//! - Search in basic, hybrid and ranked modes
//! - Watch activity and reviews
//! - Health checks

pub mod routes;

pub(crate) mod activity;
pub(crate) mod monitoring;
pub(crate) mod search;

pub use search::{ItemView, SearchParams};
