//! Product catalog persistence and services for the storefront.
//!
//! This crate provides:
//! - The product/image aggregate schema on SQLite and PostgreSQL
//! - Atomic units of work over a product and its images
//! - Vendor error-code classification
//! - The product service and the seed orchestrator

pub mod classify;
pub mod error;
pub mod models;
pub mod postgres;
pub mod repos;
pub mod seed;
pub mod service;
pub mod store;
pub mod unit_of_work;

pub use classify::{ErrorClass, ErrorCodeTable, POSTGRES_ERROR_CODES, SQLITE_ERROR_CODES};
pub use error::{CatalogError, CatalogResult, ProductError, ProductResult};
pub use models::{AggregateRecord, Product, ProductAggregate, ProductImageRow, ProductRow};
pub use postgres::PostgresStore;
pub use seed::{SeedReport, SeedService};
pub use service::ProductService;
pub use store::{CatalogStore, SqliteStore};
pub use unit_of_work::{CommitReport, StagedOp, UnitOfWork};

use std::sync::Arc;
use storefront_core::config::CatalogConfig;

/// Create a catalog store from configuration.
pub async fn from_config(config: &CatalogConfig) -> CatalogResult<Arc<dyn CatalogStore>> {
    config.validate().map_err(CatalogError::Config)?;

    match config {
        CatalogConfig::Sqlite { path } => {
            let store = SqliteStore::new(path).await?;
            Ok(Arc::new(store) as Arc<dyn CatalogStore>)
        }
        CatalogConfig::Postgres {
            url,
            host,
            port,
            username,
            password,
            database,
            ssl_mode,
            max_connections,
            statement_timeout_ms,
        } => {
            let store = if let Some(url) = url {
                tracing::info!("Connecting to PostgreSQL using connection URL");
                PostgresStore::from_url(url, *max_connections, *statement_timeout_ms).await?
            } else if let (Some(host), Some(database)) = (host.as_ref(), database.as_ref()) {
                PostgresStore::from_params(
                    host,
                    port.unwrap_or(5432),
                    username.as_deref(),
                    password.as_deref(),
                    database,
                    *ssl_mode,
                    *max_connections,
                    *statement_timeout_ms,
                )
                .await?
            } else {
                return Err(CatalogError::Config(
                    "postgres config requires either 'url' or 'host' + 'database'".to_string(),
                ));
            };
            Ok(Arc::new(store) as Arc<dyn CatalogStore>)
        }
    }
}
