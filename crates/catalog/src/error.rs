//! Catalog error types.

use storefront_core::AssetError;
use thiserror::Error;

/// Raw repository errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for repository operations.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Failures surfaced by the product services.
///
/// Persistence errors are classified into this taxonomy; anything that does
/// not classify is logged and reported as `InternalFailure` without detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    DuplicateKey(String),

    #[error("{0}")]
    InvalidUpload(String),

    #[error("unexpected error, check server logs")]
    InternalFailure,
}

impl From<AssetError> for ProductError {
    fn from(err: AssetError) -> Self {
        ProductError::InvalidUpload(err.to_string())
    }
}

/// Result type for service operations.
pub type ProductResult<T> = std::result::Result<T, ProductError>;
