//! Product image upload and download.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::body::Body;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use storefront_core::asset;
use storefront_core::{AssetError, UploadedFile};

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";

/// Upload response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub secure_url: String,
}

/// POST /api/files/product - Upload a product image.
///
/// Only the `file` field is read; other fields are ignored.
pub async fn upload_product_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let mut multipart = multipart.map_err(|_| ApiError::from(AssetError::MissingFile))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(original_name) = field.file_name().map(str::to_owned) else {
            continue;
        };

        let file = UploadedFile::new(FILE_FIELD, original_name);
        asset::filter(Some(&file))?;
        let storage_name = asset::name(Some(&file))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;
        let size = data.len();
        state.storage.put(&storage_name, data).await?;
        state.metrics.assets_uploaded.inc();

        tracing::info!(
            original_name = %file.original_name,
            storage_name = %storage_name,
            size,
            "Product image uploaded"
        );
        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                secure_url: state.config.server.product_image_url(&storage_name),
            }),
        ));
    }

    Err(AssetError::MissingFile.into())
}

/// GET /api/files/product/{image_name} - Stream a stored product image.
pub async fn get_product_image(
    State(state): State<AppState>,
    Path(image_name): Path<String>,
) -> ApiResult<Response> {
    let stream = state.storage.get_stream(&image_name).await?;

    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, content_type_for(&image_name))],
        Body::from_stream(stream),
    )
        .into_response())
}

/// Content type served for a stored image, by extension.
fn content_type_for(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
