//! Core domain types and shared logic for the storefront catalog.
//!
//! This crate defines the data model used across all other crates:
//! - Product input and output shapes
//! - Slug normalization
//! - Dual-key product lookup (identifier or title/slug)
//! - Upload filtering and storage naming
//! - Configuration

pub mod asset;
pub mod config;
pub mod error;
pub mod product;

pub use asset::{ALLOWED_EXTENSIONS, UploadedFile};
pub use error::{AssetError, Error, Result};
pub use product::{
    CreateProduct, Gender, Pagination, ProductKey, ProductView, UpdateProduct, normalize_slug,
    title_key,
};

/// Default page size for product listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Default page offset for product listings.
pub const DEFAULT_PAGE_OFFSET: u32 = 0;
