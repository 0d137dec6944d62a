//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid product: {0}")]
    InvalidProduct(String),

    #[error("invalid pagination: {0}")]
    InvalidPagination(String),
}

/// Reasons an uploaded file is not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("no file provided")]
    MissingFile,

    #[error("file type not allowed: {0}")]
    DisallowedExtension(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
