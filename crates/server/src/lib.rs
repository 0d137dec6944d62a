//! HTTP API server for the storefront product catalog.
//!
//! This crate provides:
//! - Product create, list, lookup, update and delete endpoints
//! - Product image upload and download
//! - Catalog seeding
//! - Health and Prometheus metrics endpoints

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use metrics::Metrics;
pub use routes::create_router;
pub use state::AppState;
