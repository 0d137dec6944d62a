//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use storefront_catalog::{CatalogError, ProductError};
use storefront_core::AssetError;
use storefront_storage::StorageError;

/// Message returned for failures whose detail only goes to the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "Unexpected error, check server logs";

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Error code attached to error responses so middleware can count them.
#[derive(Debug, Clone, Copy)]
pub struct ErrorCode(pub &'static str);

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    DuplicateKey(String),

    #[error("{0}")]
    InvalidUpload(String),

    #[error("internal failure")]
    InternalFailure,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("{0}")]
    Core(#[from] storefront_core::Error),
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(msg) => Self::NotFound(msg),
            ProductError::DuplicateKey(detail) => Self::DuplicateKey(detail),
            ProductError::InvalidUpload(msg) => Self::InvalidUpload(msg),
            ProductError::InternalFailure => Self::InternalFailure,
        }
    }
}

impl From<AssetError> for ApiError {
    fn from(err: AssetError) -> Self {
        ProductError::from(err).into()
    }
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::DuplicateKey(_) => "duplicate_key",
            Self::InvalidUpload(_) => "invalid_upload",
            Self::InternalFailure => "internal_error",
            Self::Storage(StorageError::NotFound(_)) => "not_found",
            Self::Storage(StorageError::InvalidKey(_)) => "bad_request",
            Self::Storage(_) => "storage_error",
            Self::Catalog(_) => "catalog_error",
            Self::Core(_) => "bad_request",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateKey(_) => StatusCode::BAD_REQUEST,
            Self::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            Self::InternalFailure => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Storage(e) => match e {
                StorageError::NotFound(_) => StatusCode::NOT_FOUND,
                StorageError::InvalidKey(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Core(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message sent to the client. Server-side failures never expose detail.
    fn public_message(&self) -> String {
        match self {
            Self::Storage(StorageError::NotFound(name)) => format!("Image {name} not found"),
            _ if self.status_code().is_server_error() => INTERNAL_ERROR_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        }
        let body = ErrorResponse {
            code: self.code().to_string(),
            message: self.public_message(),
        };
        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(ErrorCode(self.code()));
        response
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
