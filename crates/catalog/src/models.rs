//! Database models mapping to the catalog schema, and the product aggregate.

use crate::error::{CatalogError, CatalogResult};
use sqlx::FromRow;
use storefront_core::product::{derive_slug, title_key};
use storefront_core::{CreateProduct, Gender, ProductView, UpdateProduct};
use uuid::Uuid;

/// Product record. `sizes` and `tags` are JSON-encoded string arrays;
/// `title_key` is the case-folded title.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub title: String,
    pub title_key: String,
    pub price: f64,
    pub description: Option<String>,
    pub slug: String,
    pub stock: i32,
    pub sizes: String,
    pub gender: String,
    pub tags: String,
}

/// Image record owned by a product.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ProductImageRow {
    pub id: i64,
    pub url: String,
    pub product_id: Uuid,
}

/// Product with decoded column values.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    pub slug: String,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub gender: Gender,
    pub tags: Vec<String>,
}

impl Product {
    /// Build a new product from create input, returning it with the image
    /// URLs to attach.
    pub fn from_input(id: Uuid, input: CreateProduct) -> (Self, Vec<String>) {
        let slug = derive_slug(input.slug.as_deref(), &input.title);
        let product = Self {
            id,
            title: input.title,
            price: input.price,
            description: input.description,
            slug,
            stock: input.stock,
            sizes: input.sizes,
            gender: input.gender,
            tags: input.tags,
        };
        (product, input.images)
    }

    /// Merge the scalar fields of an update and re-derive the slug.
    ///
    /// Images are not touched here; they are replaced through the unit of work.
    pub fn apply(&mut self, update: &UpdateProduct) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(sizes) = &update.sizes {
            self.sizes = sizes.clone();
        }
        if let Some(gender) = update.gender {
            self.gender = gender;
        }
        if let Some(tags) = &update.tags {
            self.tags = tags.clone();
        }
        let slug = update.slug.as_deref().unwrap_or(&self.slug);
        self.slug = derive_slug(Some(slug), &self.title);
    }

    pub fn to_row(&self) -> CatalogResult<ProductRow> {
        Ok(ProductRow {
            id: self.id,
            title: self.title.clone(),
            title_key: title_key(&self.title),
            price: self.price,
            description: self.description.clone(),
            slug: self.slug.clone(),
            stock: self.stock,
            sizes: encode_list(&self.sizes)?,
            gender: self.gender.as_str().to_string(),
            tags: encode_list(&self.tags)?,
        })
    }

    /// Output shape with the given image URLs.
    pub fn into_view(self, images: Vec<String>) -> ProductView {
        ProductView {
            id: self.id,
            title: self.title,
            price: self.price,
            description: self.description,
            slug: self.slug,
            stock: self.stock,
            sizes: self.sizes,
            gender: self.gender,
            tags: self.tags,
            images,
        }
    }
}

impl ProductRow {
    pub fn into_product(self) -> CatalogResult<Product> {
        let gender = self.gender.parse::<Gender>().map_err(|e| {
            CatalogError::Internal(format!("product {}: {e}", self.id))
        })?;
        Ok(Product {
            id: self.id,
            sizes: decode_list(self.id, "sizes", &self.sizes)?,
            tags: decode_list(self.id, "tags", &self.tags)?,
            title: self.title,
            price: self.price,
            description: self.description,
            slug: self.slug,
            stock: self.stock,
            gender,
        })
    }
}

fn encode_list(values: &[String]) -> CatalogResult<String> {
    serde_json::to_string(values)
        .map_err(|e| CatalogError::Internal(format!("failed to encode list column: {e}")))
}

fn decode_list(id: Uuid, column: &str, raw: &str) -> CatalogResult<Vec<String>> {
    serde_json::from_str(raw).map_err(|e| {
        CatalogError::Internal(format!("product {id}: malformed {column} column: {e}"))
    })
}

/// A product with its owned images, in ascending image id order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductAggregate {
    pub product: Product,
    pub images: Vec<ProductImageRow>,
}

impl ProductAggregate {
    /// Flatten images to URL strings.
    pub fn into_view(self) -> ProductView {
        let images = self.images.into_iter().map(|image| image.url).collect();
        self.product.into_view(images)
    }
}

/// Column list shared by every product query.
pub(crate) const PRODUCT_COLUMNS: &str =
    "id, title, title_key, price, description, slug, stock, sizes, gender, tags";

/// Wrap a product `SELECT` in a join with its images.
///
/// The whole aggregate is read by one statement, so a concurrent commit is
/// seen either entirely or not at all. Rows come back ordered by title, then
/// by image id.
pub(crate) fn aggregate_query(products: &str) -> String {
    format!(
        "SELECT p.id, p.title, p.title_key, p.price, p.description, p.slug, p.stock, \
         p.sizes, p.gender, p.tags, i.id AS image_id, i.url AS image_url \
         FROM ({products}) p LEFT JOIN product_images i ON i.product_id = p.id \
         ORDER BY p.title, i.id"
    )
}

/// One row of the product/image join. Image columns are null for a product
/// without images.
#[derive(Debug, Clone, FromRow)]
pub struct AggregateJoinRow {
    #[sqlx(flatten)]
    pub product: ProductRow,
    pub image_id: Option<i64>,
    pub image_url: Option<String>,
}

/// A product row with its image rows, read together.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRecord {
    pub product: ProductRow,
    pub images: Vec<ProductImageRow>,
}

impl AggregateRecord {
    /// Group join rows by product, keeping row order.
    pub fn group(rows: Vec<AggregateJoinRow>) -> Vec<Self> {
        let mut records: Vec<Self> = Vec::new();
        for row in rows {
            let image = match (row.image_id, row.image_url) {
                (Some(id), Some(url)) => Some(ProductImageRow {
                    id,
                    url,
                    product_id: row.product.id,
                }),
                _ => None,
            };
            let product_id = row.product.id;
            if let Some(last) = records
                .last_mut()
                .filter(|last| last.product.id == product_id)
            {
                last.images.extend(image);
                continue;
            }
            records.push(Self {
                product: row.product,
                images: image.into_iter().collect(),
            });
        }
        records
    }

    pub fn into_aggregate(self) -> CatalogResult<ProductAggregate> {
        Ok(ProductAggregate {
            product: self.product.into_product()?,
            images: self.images,
        })
    }
}
