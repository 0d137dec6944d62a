//! Catalog reseeding from a fixed product dataset.

use crate::error::{ProductError, ProductResult};
use crate::service::ProductService;
use futures::future::try_join_all;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use storefront_core::CreateProduct;
use tracing::Span;

/// Dataset shipped with the binary.
const SEED_DATA: &str = include_str!("seed_data.json");

/// Outcome of a seed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub deleted: u64,
    pub inserted: usize,
}

/// Replaces the whole catalog with the seed dataset.
pub struct SeedService {
    products: Arc<ProductService>,
    dataset: String,
    span: Span,
}

impl SeedService {
    /// Seed service over the built-in dataset.
    pub fn new(products: Arc<ProductService>, span: Span) -> Self {
        Self::with_dataset(products, SEED_DATA, span)
    }

    /// Seed service over a custom JSON array of products.
    pub fn with_dataset(
        products: Arc<ProductService>,
        dataset: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            products,
            dataset: dataset.into(),
            span,
        }
    }

    /// Delete every product, then create all well-formed dataset entries
    /// concurrently.
    ///
    /// The first failing create is returned; creates that already committed
    /// stay in place.
    pub async fn run_seed(&self) -> ProductResult<SeedReport> {
        let entries = self.entries()?;
        let deleted = self.products.delete_all_products().await?;

        let inserted = entries.len();
        try_join_all(entries.into_iter().map(|entry| self.products.create(entry))).await?;

        tracing::info!(parent: &self.span, deleted, inserted, "Seed executed");
        Ok(SeedReport { deleted, inserted })
    }

    /// Parse the dataset, skipping null and malformed entries.
    fn entries(&self) -> ProductResult<Vec<CreateProduct>> {
        let values: Vec<Value> = serde_json::from_str(&self.dataset).map_err(|e| {
            tracing::error!(parent: &self.span, error = %e, "Seed dataset is not a JSON array");
            ProductError::InternalFailure
        })?;

        let entries = values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| {
                if value.is_null() {
                    tracing::warn!(parent: &self.span, index, "Skipping empty seed entry");
                    return None;
                }
                match serde_json::from_value::<CreateProduct>(value) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::warn!(
                            parent: &self.span,
                            index,
                            error = %e,
                            "Skipping malformed seed entry"
                        );
                        None
                    }
                }
            })
            .collect();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    async fn service(dataset: &str) -> (SeedService, Arc<ProductService>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("catalog.db")).await.unwrap();
        let products = Arc::new(ProductService::new(Arc::new(store), Span::none()));
        let seed = SeedService::with_dataset(products.clone(), dataset, Span::none());
        (seed, products, dir)
    }

    #[test]
    fn test_builtin_dataset_is_well_formed() {
        let values: Vec<Value> = serde_json::from_str(SEED_DATA).unwrap();
        assert!(!values.is_empty());
        for value in values {
            let entry: CreateProduct = serde_json::from_value(value).unwrap();
            entry.validate().unwrap();
        }
    }

    #[tokio::test]
    async fn test_entries_skip_null_and_malformed() {
        let dataset = r#"[
            {"title": "Tee", "gender": "men"},
            null,
            {"title": "No Gender"},
            {"title": "Cap", "gender": "unisex", "images": ["cap.jpg"]}
        ]"#;
        let (seed, _, _dir) = service(dataset).await;
        let entries = seed.entries().unwrap();
        let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Tee", "Cap"]);
    }

    #[tokio::test]
    async fn test_invalid_dataset_is_internal_failure() {
        let (seed, _, _dir) = service("{not json").await;
        assert_eq!(seed.run_seed().await, Err(ProductError::InternalFailure));
    }
}
