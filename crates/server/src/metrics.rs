//! Prometheus metrics for the storefront server.
//!
//! Every [`AppState`] owns its own [`Metrics`] registry, so independent
//! servers (and tests) in one process never share counters.
//!
//! The `/metrics` endpoint is unauthenticated and should be reachable only
//! from the Prometheus scraper.

use crate::error::ErrorCode;
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Counters for catalog and asset activity.
pub struct Metrics {
    registry: Registry,
    pub products_created: IntCounter,
    pub products_updated: IntCounter,
    pub products_deleted: IntCounter,
    pub seed_runs: IntCounter,
    pub assets_uploaded: IntCounter,
    pub api_errors: IntCounterVec,
}

impl Metrics {
    /// Create and register all counters in a fresh registry.
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let products_created = IntCounter::new(
            "storefront_products_created_total",
            "Total number of products created",
        )?;
        let products_updated = IntCounter::new(
            "storefront_products_updated_total",
            "Total number of products updated",
        )?;
        let products_deleted = IntCounter::new(
            "storefront_products_deleted_total",
            "Total number of products deleted, including seed wipes",
        )?;
        let seed_runs = IntCounter::new(
            "storefront_seed_runs_total",
            "Total number of completed seed runs",
        )?;
        let assets_uploaded = IntCounter::new(
            "storefront_assets_uploaded_total",
            "Total number of product images uploaded",
        )?;
        let api_errors = IntCounterVec::new(
            Opts::new("storefront_api_errors_total", "API error responses by code"),
            &["code"],
        )?;

        registry.register(Box::new(products_created.clone()))?;
        registry.register(Box::new(products_updated.clone()))?;
        registry.register(Box::new(products_deleted.clone()))?;
        registry.register(Box::new(seed_runs.clone()))?;
        registry.register(Box::new(assets_uploaded.clone()))?;
        registry.register(Box::new(api_errors.clone()))?;

        Ok(Self {
            registry,
            products_created,
            products_updated,
            products_deleted,
            seed_runs,
            assets_uploaded,
            api_errors,
        })
    }

    pub fn record_error(&self, code: &str) {
        self.api_errors.with_label_values(&[code]).inc();
    }

    /// Encode all metrics in the Prometheus text format.
    pub fn encode(&self) -> prometheus::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(buffer)
    }
}

/// GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(buffer) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}

/// Count error responses by their [`ErrorCode`].
pub async fn track_api_errors(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if let Some(ErrorCode(code)) = response.extensions().get::<ErrorCode>() {
        state.metrics.record_error(code);
    }
    response
}
