//! Product aggregate service.
//!
//! A product and its images are written together through one
//! [`UnitOfWork`]; images are never modified on their own.

use crate::error::{CatalogError, ProductError, ProductResult};
use crate::models::{Product, ProductAggregate};
use crate::store::CatalogStore;
use crate::unit_of_work::UnitOfWork;
use std::sync::Arc;
use storefront_core::{CreateProduct, Pagination, ProductKey, ProductView, UpdateProduct};
use tracing::Span;
use uuid::Uuid;

/// Create, read, update and delete operations on the product aggregate.
pub struct ProductService {
    store: Arc<dyn CatalogStore>,
    span: Span,
}

impl ProductService {
    /// Create a service logging under `span`.
    pub fn new(store: Arc<dyn CatalogStore>, span: Span) -> Self {
        Self { store, span }
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    /// Persist a new product with one image per supplied URL.
    pub async fn create(&self, input: CreateProduct) -> ProductResult<ProductView> {
        let (product, urls) = Product::from_input(Uuid::new_v4(), input);
        let row = product.to_row().map_err(|e| self.fail(e))?;

        let mut work = UnitOfWork::new();
        work.insert_product(row)
            .insert_images(product.id, urls.clone());
        self.store.commit(work).await.map_err(|e| self.fail(e))?;

        tracing::debug!(
            parent: &self.span,
            product_id = %product.id,
            slug = %product.slug,
            images = urls.len(),
            "Created product"
        );
        Ok(product.into_view(urls))
    }

    /// List products ordered by title.
    pub async fn find_all(&self, pagination: Pagination) -> ProductResult<Vec<ProductView>> {
        let records = self
            .store
            .list_aggregates(pagination.limit(), pagination.offset())
            .await
            .map_err(|e| self.fail(e))?;

        records
            .into_iter()
            .map(|record| {
                let aggregate = record.into_aggregate().map_err(|e| self.fail(e))?;
                Ok(aggregate.into_view())
            })
            .collect()
    }

    /// Resolve a product by identifier, title or slug, with its images.
    pub async fn find_one(&self, term: &str) -> ProductResult<ProductAggregate> {
        self.store
            .find_aggregate(ProductKey::parse(term))
            .await
            .map_err(|e| self.fail(e))?
            .ok_or_else(|| ProductError::NotFound(format!("Product with {term} not found")))?
            .into_aggregate()
            .map_err(|e| self.fail(e))
    }

    /// [`find_one`](Self::find_one) with images flattened to URLs.
    pub async fn find_one_plain(&self, term: &str) -> ProductResult<ProductView> {
        Ok(self.find_one(term).await?.into_view())
    }

    /// Merge `input` into the stored product. Supplied images replace the
    /// whole image set.
    pub async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<ProductView> {
        let row = self
            .store
            .get_product(id)
            .await
            .map_err(|e| self.fail(e))?
            .ok_or_else(|| ProductError::NotFound(format!("Product with id: {id} not found")))?;
        let mut product = row.into_product().map_err(|e| self.fail(e))?;
        product.apply(&input);

        let mut work = UnitOfWork::new();
        if let Some(urls) = input.images {
            work.delete_images_of(id).insert_images(id, urls);
        }
        work.update_product(product.to_row().map_err(|e| self.fail(e))?);
        self.store.commit(work).await.map_err(|e| self.fail(e))?;

        tracing::debug!(parent: &self.span, product_id = %id, "Updated product");
        self.find_one_plain(&id.to_string()).await
    }

    /// Delete a product and its images.
    pub async fn remove(&self, id: Uuid) -> ProductResult<String> {
        let aggregate = self.find_one(&id.to_string()).await?;

        let mut work = UnitOfWork::new();
        work.delete_product(id);
        self.store.commit(work).await.map_err(|e| self.fail(e))?;

        tracing::debug!(parent: &self.span, product_id = %id, "Removed product");
        Ok(format!(
            "This action removes a #{} product",
            aggregate.product.slug
        ))
    }

    /// Delete every product. Returns the number of products removed.
    pub async fn delete_all_products(&self) -> ProductResult<u64> {
        let mut work = UnitOfWork::new();
        work.delete_all_products();
        let report = self.store.commit(work).await.map_err(|e| self.fail(e))?;
        Ok(report.total())
    }

    /// Classify a repository error; unclassified errors are logged in full
    /// and hidden from the caller.
    fn fail(&self, err: CatalogError) -> ProductError {
        match self.store.error_codes().classify(err) {
            Ok(classified) => classified,
            Err(err) => {
                tracing::error!(
                    parent: &self.span,
                    error = %err,
                    backend = self.store.error_codes().backend(),
                    "Catalog operation failed"
                );
                ProductError::InternalFailure
            }
        }
    }
}
