//! Product image repository trait.

use crate::error::CatalogResult;
use crate::models::ProductImageRow;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for product image reads.
#[async_trait]
pub trait ImageRepo: Send + Sync {
    /// Images owned by one product, ordered by image id.
    async fn get_images(&self, product_id: Uuid) -> CatalogResult<Vec<ProductImageRow>>;

    /// Count all images.
    async fn count_images(&self) -> CatalogResult<u64>;
}
