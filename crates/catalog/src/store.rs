//! Catalog store trait and the SQLite implementation.

use crate::classify::{ErrorCodeTable, SQLITE_ERROR_CODES};
use crate::error::{CatalogError, CatalogResult};
use crate::repos::{ImageRepo, ProductRepo};
use crate::unit_of_work::{CommitReport, StagedOp, UnitOfWork};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePoolOptions};
use sqlx::{Pool, QueryBuilder, Sqlite};
use std::path::Path;
use std::time::Duration;

/// Combined catalog store trait.
#[async_trait]
pub trait CatalogStore: ProductRepo + ImageRepo + Send + Sync {
    /// Create the schema if it does not exist.
    async fn migrate(&self) -> CatalogResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> CatalogResult<()>;

    /// Apply every staged operation in one transaction.
    ///
    /// On the first failing operation the transaction is rolled back and the
    /// error returned; nothing staged is visible afterwards.
    async fn commit(&self, work: UnitOfWork) -> CatalogResult<CommitReport>;

    /// Vendor error codes of this engine.
    fn error_codes(&self) -> &'static ErrorCodeTable;

    /// Name of this backend, used for logging.
    fn backend_name(&self) -> &'static str;
}

/// SQLite-based catalog store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and apply the schema.
    pub async fn new(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        // SQLite allows one writer; a single connection keeps concurrent
        // requests from failing with "database is locked".
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        tracing::info!(path = %path.display(), "Opened SQLite catalog");
        Ok(store)
    }
}

/// Execute one staged operation on an open transaction.
async fn execute_op(conn: &mut SqliteConnection, op: &StagedOp) -> CatalogResult<u64> {
    let affected = match op {
        StagedOp::InsertProduct(row) => sqlx::query(
            "INSERT INTO products \
             (id, title, title_key, price, description, slug, stock, sizes, gender, tags) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(row.id)
        .bind(&row.title)
        .bind(&row.title_key)
        .bind(row.price)
        .bind(&row.description)
        .bind(&row.slug)
        .bind(row.stock)
        .bind(&row.sizes)
        .bind(&row.gender)
        .bind(&row.tags)
        .execute(&mut *conn)
        .await?
        .rows_affected(),
        StagedOp::UpdateProduct(row) => {
            let affected = sqlx::query(
                "UPDATE products SET title = ?, title_key = ?, price = ?, description = ?, \
                 slug = ?, stock = ?, sizes = ?, gender = ?, tags = ? WHERE id = ?",
            )
            .bind(&row.title)
            .bind(&row.title_key)
            .bind(row.price)
            .bind(&row.description)
            .bind(&row.slug)
            .bind(row.stock)
            .bind(&row.sizes)
            .bind(&row.gender)
            .bind(&row.tags)
            .bind(row.id)
            .execute(&mut *conn)
            .await?
            .rows_affected();
            if affected == 0 {
                return Err(CatalogError::NotFound(format!("product {}", row.id)));
            }
            affected
        }
        StagedOp::DeleteImagesOf(product_id) => {
            sqlx::query("DELETE FROM product_images WHERE product_id = ?")
                .bind(product_id)
                .execute(&mut *conn)
                .await?
                .rows_affected()
        }
        StagedOp::InsertImages { product_id, urls } => {
            let mut builder: QueryBuilder<Sqlite> =
                QueryBuilder::new("INSERT INTO product_images (url, product_id) ");
            builder.push_values(urls, |mut b, url| {
                b.push_bind(url).push_bind(*product_id);
            });
            builder.build().execute(&mut *conn).await?.rows_affected()
        }
        StagedOp::DeleteProduct(product_id) => {
            let affected = sqlx::query("DELETE FROM products WHERE id = ?")
                .bind(product_id)
                .execute(&mut *conn)
                .await?
                .rows_affected();
            if affected == 0 {
                return Err(CatalogError::NotFound(format!("product {product_id}")));
            }
            affected
        }
        StagedOp::DeleteAllProducts => sqlx::query("DELETE FROM products")
            .execute(&mut *conn)
            .await?
            .rows_affected(),
    };
    Ok(affected)
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn migrate(&self) -> CatalogResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> CatalogResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn commit(&self, work: UnitOfWork) -> CatalogResult<CommitReport> {
        let mut tx = self.pool.begin().await?;
        let mut affected = Vec::with_capacity(work.len());

        for op in work.ops() {
            match execute_op(&mut *tx, op).await {
                Ok(rows) => affected.push(rows),
                Err(err) => {
                    if let Err(rollback_err) = tx.rollback().await {
                        tracing::error!(
                            error = %rollback_err,
                            backend = "sqlite",
                            "Failed to roll back catalog transaction"
                        );
                    }
                    return Err(err);
                }
            }
        }

        tx.commit().await?;
        Ok(CommitReport::new(affected))
    }

    fn error_codes(&self) -> &'static ErrorCodeTable {
        &SQLITE_ERROR_CODES
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

mod sqlite_impl {
    use super::*;
    use crate::models::{
        AggregateJoinRow, AggregateRecord, PRODUCT_COLUMNS, ProductImageRow, ProductRow,
        aggregate_query,
    };
    use storefront_core::ProductKey;
    use storefront_core::product::title_key;
    use uuid::Uuid;

    #[async_trait]
    impl ProductRepo for SqliteStore {
        async fn get_product(&self, id: Uuid) -> CatalogResult<Option<ProductRow>> {
            let row = sqlx::query_as::<_, ProductRow>(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn find_aggregate(
            &self,
            key: ProductKey<'_>,
        ) -> CatalogResult<Option<AggregateRecord>> {
            let rows = match key {
                ProductKey::Id(id) => {
                    sqlx::query_as::<_, AggregateJoinRow>(&aggregate_query(&format!(
                        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
                    )))
                    .bind(id)
                    .fetch_all(&self.pool)
                    .await?
                }
                // Slugs are stored lower-cased, so both columns compare
                // against the folded term.
                ProductKey::Term(term) => {
                    sqlx::query_as::<_, AggregateJoinRow>(&aggregate_query(&format!(
                        "SELECT {PRODUCT_COLUMNS} FROM products \
                         WHERE title_key = ? OR slug = ? ORDER BY title LIMIT 1"
                    )))
                    .bind(title_key(term))
                    .bind(term.to_lowercase())
                    .fetch_all(&self.pool)
                    .await?
                }
            };
            Ok(AggregateRecord::group(rows).into_iter().next())
        }

        async fn list_aggregates(
            &self,
            limit: u32,
            offset: u32,
        ) -> CatalogResult<Vec<AggregateRecord>> {
            let rows = sqlx::query_as::<_, AggregateJoinRow>(&aggregate_query(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY title LIMIT ? OFFSET ?"
            )))
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&self.pool)
            .await?;
            Ok(AggregateRecord::group(rows))
        }

        async fn count_products(&self) -> CatalogResult<u64> {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
                .fetch_one(&self.pool)
                .await?;
            Ok(count as u64)
        }
    }

    #[async_trait]
    impl ImageRepo for SqliteStore {
        async fn get_images(&self, product_id: Uuid) -> CatalogResult<Vec<ProductImageRow>> {
            let rows = sqlx::query_as::<_, ProductImageRow>(
                "SELECT id, url, product_id FROM product_images WHERE product_id = ? ORDER BY id",
            )
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn count_images(&self) -> CatalogResult<u64> {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_images")
                .fetch_one(&self.pool)
                .await?;
            Ok(count as u64)
        }
    }
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id BLOB PRIMARY KEY,
    title TEXT NOT NULL UNIQUE,
    title_key TEXT NOT NULL,
    price REAL NOT NULL DEFAULT 0,
    description TEXT,
    slug TEXT NOT NULL UNIQUE,
    stock INTEGER NOT NULL DEFAULT 0,
    sizes TEXT NOT NULL DEFAULT '[]',
    gender TEXT NOT NULL,
    tags TEXT NOT NULL DEFAULT '[]'
);
CREATE INDEX IF NOT EXISTS idx_products_title ON products(title);
CREATE INDEX IF NOT EXISTS idx_products_title_key ON products(title_key);

CREATE TABLE IF NOT EXISTS product_images (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    product_id BLOB NOT NULL REFERENCES products(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_product_images_product ON product_images(product_id);
"#;
