//! Application state shared across handlers.

use crate::metrics::Metrics;
use std::sync::Arc;
use storefront_catalog::{CatalogStore, ProductService, SeedService};
use storefront_core::config::AppConfig;
use storefront_storage::AssetStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Uploaded image storage.
    pub storage: Arc<dyn AssetStore>,
    /// Catalog store.
    pub catalog: Arc<dyn CatalogStore>,
    /// Product aggregate service.
    pub products: Arc<ProductService>,
    /// Seed orchestrator.
    pub seed: Arc<SeedService>,
    /// Prometheus counters for this instance.
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Wire services over the given stores.
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn AssetStore>,
        catalog: Arc<dyn CatalogStore>,
    ) -> prometheus::Result<Self> {
        let products = Arc::new(ProductService::new(
            catalog.clone(),
            tracing::info_span!("product_service", backend = catalog.backend_name()),
        ));
        let seed = Arc::new(SeedService::new(
            products.clone(),
            tracing::info_span!("seed_service"),
        ));

        Ok(Self {
            config: Arc::new(config),
            storage,
            catalog,
            products,
            seed,
            metrics: Arc::new(Metrics::new()?),
        })
    }

    /// Replace the seed dataset with a custom JSON array.
    pub fn with_seed_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.seed = Arc::new(SeedService::with_dataset(
            self.products.clone(),
            dataset,
            tracing::info_span!("seed_service"),
        ));
        self
    }
}
