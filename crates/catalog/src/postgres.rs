//! PostgreSQL-based catalog store implementation.

use crate::classify::{ErrorCodeTable, POSTGRES_ERROR_CODES};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    AggregateJoinRow, AggregateRecord, PRODUCT_COLUMNS, ProductImageRow, ProductRow,
    aggregate_query,
};
use crate::repos::{ImageRepo, ProductRepo};
use crate::store::CatalogStore;
use crate::unit_of_work::{CommitReport, StagedOp, UnitOfWork};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPoolOptions, PgSslMode as SqlxPgSslMode};
use sqlx::{Pool, Postgres, QueryBuilder};
use std::str::FromStr;
use storefront_core::ProductKey;
use storefront_core::config::PgSslMode;
use storefront_core::product::title_key;
use uuid::Uuid;

/// PostgreSQL schema (embedded).
const POSTGRES_SCHEMA: &str = include_str!("postgres_schema.sql");

/// Split the schema into statements; PostgreSQL prepares one at a time.
fn postgres_schema_statements(schema: &str) -> Vec<&str> {
    schema
        .split(';')
        .filter_map(|statement| {
            let trimmed = statement.trim();
            let has_sql = trimmed.lines().any(|line| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with("--")
            });
            has_sql.then_some(trimmed)
        })
        .collect()
}

/// PostgreSQL-based catalog store.
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    /// Connect using a full connection URL.
    pub async fn from_url(
        url: &str,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> CatalogResult<Self> {
        let opts = PgConnectOptions::from_str(url)?;
        Self::connect(opts, max_connections, statement_timeout_ms).await
    }

    /// Connect using individual parameters, so the password can come from
    /// the environment.
    #[allow(clippy::too_many_arguments)]
    pub async fn from_params(
        host: &str,
        port: u16,
        username: Option<&str>,
        password: Option<&str>,
        database: &str,
        ssl_mode: Option<PgSslMode>,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> CatalogResult<Self> {
        let mut opts = PgConnectOptions::new()
            .host(host)
            .port(port)
            .database(database);

        if let Some(user) = username {
            opts = opts.username(user);
        }

        if let Some(pass) = password {
            opts = opts.password(pass);
        }

        if let Some(mode) = ssl_mode {
            let sqlx_mode = match mode {
                PgSslMode::Disable => SqlxPgSslMode::Disable,
                PgSslMode::Prefer => SqlxPgSslMode::Prefer,
                PgSslMode::Require => SqlxPgSslMode::Require,
            };
            opts = opts.ssl_mode(sqlx_mode);
        }

        tracing::info!(
            host = host,
            port = port,
            database = database,
            username = username.unwrap_or("<none>"),
            ssl_mode = ?ssl_mode,
            "Connecting to PostgreSQL with individual parameters"
        );

        Self::connect(opts, max_connections, statement_timeout_ms).await
    }

    async fn connect(
        mut opts: PgConnectOptions,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> CatalogResult<Self> {
        if let Some(timeout_ms) = statement_timeout_ms {
            opts = opts.options([("statement_timeout", format!("{timeout_ms}ms"))]);
            tracing::info!("PostgreSQL statement_timeout set to {}ms", timeout_ms);
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        Ok(store)
    }
}

async fn execute_op(conn: &mut PgConnection, op: &StagedOp) -> CatalogResult<u64> {
    let affected = match op {
        StagedOp::InsertProduct(row) => sqlx::query(
            "INSERT INTO products \
             (id, title, title_key, price, description, slug, stock, sizes, gender, tags) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
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
                "UPDATE products SET title = $1, title_key = $2, price = $3, description = $4, \
                 slug = $5, stock = $6, sizes = $7, gender = $8, tags = $9 WHERE id = $10",
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
            sqlx::query("DELETE FROM product_images WHERE product_id = $1")
                .bind(product_id)
                .execute(&mut *conn)
                .await?
                .rows_affected()
        }
        StagedOp::InsertImages { product_id, urls } => {
            let mut builder: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO product_images (url, product_id) ");
            builder.push_values(urls, |mut b, url| {
                b.push_bind(url).push_bind(*product_id);
            });
            builder.build().execute(&mut *conn).await?.rows_affected()
        }
        StagedOp::DeleteProduct(product_id) => {
            let affected = sqlx::query("DELETE FROM products WHERE id = $1")
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
impl CatalogStore for PostgresStore {
    async fn migrate(&self) -> CatalogResult<()> {
        for statement in postgres_schema_statements(POSTGRES_SCHEMA) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
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
                            backend = "postgres",
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
        &POSTGRES_ERROR_CODES
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

#[async_trait]
impl ProductRepo for PostgresStore {
    async fn get_product(&self, id: Uuid) -> CatalogResult<Option<ProductRow>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
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
                    "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
                )))
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
            ProductKey::Term(term) => {
                sqlx::query_as::<_, AggregateJoinRow>(&aggregate_query(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products \
                     WHERE title_key = $1 OR slug = $2 ORDER BY title LIMIT 1"
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
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY title LIMIT $1 OFFSET $2"
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
impl ImageRepo for PostgresStore {
    async fn get_images(&self, product_id: Uuid) -> CatalogResult<Vec<ProductImageRow>> {
        let rows = sqlx::query_as::<_, ProductImageRow>(
            "SELECT id, url, product_id FROM product_images WHERE product_id = $1 ORDER BY id",
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
