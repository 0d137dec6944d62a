//! Seed endpoint.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

/// Seed response.
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: &'static str,
    pub deleted: u64,
    pub inserted: usize,
}

/// GET /api/seed - Replace the catalog with the seed dataset.
pub async fn run_seed(State(state): State<AppState>) -> ApiResult<Json<SeedResponse>> {
    let report = state.seed.run_seed().await?;

    state.metrics.seed_runs.inc();
    state.metrics.products_deleted.inc_by(report.deleted);
    state.metrics.products_created.inc_by(report.inserted as u64);

    Ok(Json(SeedResponse {
        message: "SEED EXECUTED",
        deleted: report.deleted,
        inserted: report.inserted,
    }))
}
