//! Product repository trait.

use crate::error::CatalogResult;
use crate::models::{AggregateRecord, ProductRow};
use async_trait::async_trait;
use storefront_core::ProductKey;
use uuid::Uuid;

/// Repository for product reads.
///
/// Aggregate reads return a product together with its images from a single
/// statement.
#[async_trait]
pub trait ProductRepo: Send + Sync {
    /// Get a product row by identifier, without images.
    async fn get_product(&self, id: Uuid) -> CatalogResult<Option<ProductRow>>;

    /// Resolve `key` to one product with its images. A term matches the
    /// case-folded title or the slug.
    async fn find_aggregate(&self, key: ProductKey<'_>) -> CatalogResult<Option<AggregateRecord>>;

    /// One page of products with their images, ordered by title.
    async fn list_aggregates(
        &self,
        limit: u32,
        offset: u32,
    ) -> CatalogResult<Vec<AggregateRecord>>;

    /// Count all products.
    async fn count_products(&self) -> CatalogResult<u64>;
}
