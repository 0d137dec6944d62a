//! Staged writes committed atomically by a [`CatalogStore`](crate::CatalogStore).

use crate::models::ProductRow;
use uuid::Uuid;

/// A single staged write.
#[derive(Debug, Clone, PartialEq)]
pub enum StagedOp {
    InsertProduct(ProductRow),
    /// Overwrite every column of an existing product. Fails with `NotFound`
    /// if no row matches.
    UpdateProduct(ProductRow),
    DeleteImagesOf(Uuid),
    InsertImages { product_id: Uuid, urls: Vec<String> },
    /// Delete one product; its images cascade. Fails with `NotFound` if no
    /// row matches.
    DeleteProduct(Uuid),
    /// Delete every product; images cascade.
    DeleteAllProducts,
}

/// Ordered list of writes that either all apply or none do.
///
/// Backends run the operations in staging order inside one transaction and
/// roll back on the first failure.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UnitOfWork {
    ops: Vec<StagedOp>,
}

impl UnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, op: StagedOp) -> &mut Self {
        self.ops.push(op);
        self
    }

    pub fn insert_product(&mut self, row: ProductRow) -> &mut Self {
        self.stage(StagedOp::InsertProduct(row))
    }

    pub fn update_product(&mut self, row: ProductRow) -> &mut Self {
        self.stage(StagedOp::UpdateProduct(row))
    }

    pub fn delete_images_of(&mut self, product_id: Uuid) -> &mut Self {
        self.stage(StagedOp::DeleteImagesOf(product_id))
    }

    /// Stage image inserts; a no-op when `urls` is empty.
    pub fn insert_images(&mut self, product_id: Uuid, urls: Vec<String>) -> &mut Self {
        if urls.is_empty() {
            return self;
        }
        self.stage(StagedOp::InsertImages { product_id, urls })
    }

    pub fn delete_product(&mut self, product_id: Uuid) -> &mut Self {
        self.stage(StagedOp::DeleteProduct(product_id))
    }

    pub fn delete_all_products(&mut self) -> &mut Self {
        self.stage(StagedOp::DeleteAllProducts)
    }

    pub fn ops(&self) -> &[StagedOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Rows affected by each committed operation, in staging order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    affected: Vec<u64>,
}

impl CommitReport {
    pub fn new(affected: Vec<u64>) -> Self {
        Self { affected }
    }

    /// Rows affected by the operation at `index`.
    pub fn affected(&self, index: usize) -> Option<u64> {
        self.affected.get(index).copied()
    }

    pub fn total(&self) -> u64 {
        self.affected.iter().sum()
    }
}
