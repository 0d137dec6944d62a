//! Product endpoints.

use super::common::{parse_id, parse_json};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use bytes::Bytes;
use serde::Serialize;
use storefront_core::{CreateProduct, Pagination, ProductView, UpdateProduct};

/// Response for product deletion.
#[derive(Debug, Serialize)]
pub struct DeleteProductResponse {
    pub message: String,
}

/// POST /api/products - Create a product with its images.
pub async fn create_product(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ProductView>)> {
    let input: CreateProduct = parse_json(&body)?;
    input.validate()?;

    let product = state.products.create(input).await?;
    state.metrics.products_created.inc();

    tracing::info!(product_id = %product.id, slug = %product.slug, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/products - List a page of products ordered by title.
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> ApiResult<Json<Vec<ProductView>>> {
    let Query(pagination) =
        query.map_err(|e| ApiError::BadRequest(format!("invalid pagination: {e}")))?;
    pagination.validate()?;

    Ok(Json(state.products.find_all(pagination).await?))
}

/// GET /api/products/{term} - Find a product by id, title or slug.
pub async fn get_product(
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> ApiResult<Json<ProductView>> {
    Ok(Json(state.products.find_one_plain(&term).await?))
}

/// PATCH /api/products/{id} - Partially update a product.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<ProductView>> {
    let id = parse_id(&id)?;
    let input: UpdateProduct = parse_json(&body)?;
    input.validate()?;

    let product = state.products.update(id, input).await?;
    state.metrics.products_updated.inc();

    tracing::info!(product_id = %id, "Product updated");
    Ok(Json(product))
}

/// DELETE /api/products/{id} - Delete a product and its images.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteProductResponse>> {
    let id = parse_id(&id)?;
    let message = state.products.remove(id).await?;
    state.metrics.products_deleted.inc();

    tracing::info!(product_id = %id, "Product deleted");
    Ok(Json(DeleteProductResponse { message }))
}
