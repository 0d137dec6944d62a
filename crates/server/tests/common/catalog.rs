//! Catalog store test utilities.

use std::sync::Arc;
use storefront_catalog::{
    CatalogError, CatalogResult, CatalogStore, PostgresStore, ProductService, SqliteStore,
};
use tempfile::TempDir;
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tracing::Span;

/// Stable prefix for Docker/container startup failures in Postgres test setup.
/// Tests use this marker to decide whether to skip due to unavailable Docker.
pub const POSTGRES_CONTAINER_START_ERR_PREFIX: &str = "postgres-container-start:";

/// A SQLite-backed product service that cleans up on drop.
#[allow(dead_code)]
pub struct TestCatalog {
    pub store: Arc<SqliteStore>,
    pub products: Arc<ProductService>,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestCatalog {
    pub async fn new() -> CatalogResult<Self> {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let store = Arc::new(SqliteStore::new(temp_dir.path().join("catalog.db")).await?);
        let products = Arc::new(ProductService::new(
            store.clone() as Arc<dyn CatalogStore>,
            Span::none(),
        ));

        Ok(Self {
            store,
            products,
            _temp_dir: temp_dir,
        })
    }
}

/// PostgreSQL-backed product service that manages a testcontainer.
#[allow(dead_code)]
pub struct PostgresTestCatalog {
    pub store: Arc<PostgresStore>,
    pub products: Arc<ProductService>,
    _container: ContainerAsync<Postgres>,
}

#[allow(dead_code)]
impl PostgresTestCatalog {
    pub async fn new() -> CatalogResult<Self> {
        let container = Postgres::default()
            .with_tag("15-alpine")
            .start()
            .await
            .map_err(|e| {
                CatalogError::Internal(format!(
                    "{} Failed to start PostgreSQL container: {e}",
                    POSTGRES_CONTAINER_START_ERR_PREFIX
                ))
            })?;

        let host = container.get_host().await.expect("Failed to get host");
        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("Failed to get port");

        // Default credentials from testcontainers-modules postgres
        let url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

        let store = Arc::new(PostgresStore::from_url(&url, 5, None).await?);
        let products = Arc::new(ProductService::new(
            store.clone() as Arc<dyn CatalogStore>,
            Span::none(),
        ));

        Ok(Self {
            store,
            products,
            _container: container,
        })
    }
}
