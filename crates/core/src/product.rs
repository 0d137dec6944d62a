//! Product input/output shapes, slug rules and lookup keys.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Length of a canonical hyphenated UUID (`8-4-4-4-12`).
const CANONICAL_UUID_LEN: usize = 36;

/// Product audience category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
    Kid,
    Unisex,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Men => "men",
            Gender::Women => "women",
            Gender::Kid => "kid",
            Gender::Unisex => "unisex",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "men" => Ok(Gender::Men),
            "women" => Ok(Gender::Women),
            "kid" => Ok(Gender::Kid),
            "unisex" => Ok(Gender::Unisex),
            other => Err(Error::InvalidProduct(format!("unknown gender: {other}"))),
        }
    }
}

/// Normalize a raw slug: lower-case, spaces to underscores, apostrophes removed.
pub fn normalize_slug(raw: &str) -> String {
    raw.to_lowercase().replace(' ', "_").replace('\'', "")
}

/// Case-folded title used for case-insensitive title lookups.
///
/// Folding happens here rather than in SQL because SQLite's `LOWER` only
/// maps ASCII letters.
pub fn title_key(title: &str) -> String {
    title.to_lowercase()
}

/// Compute the slug for a product from an optional explicit slug and its title.
///
/// A missing or blank slug falls back to the title.
pub fn derive_slug(slug: Option<&str>, title: &str) -> String {
    match slug {
        Some(slug) if !slug.trim().is_empty() => normalize_slug(slug),
        _ => normalize_slug(title),
    }
}

/// How a lookup term addresses a product.
///
/// Terms shaped like a canonical UUID go to the primary key; anything else is
/// matched case-insensitively against title or slug.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductKey<'a> {
    Id(Uuid),
    Term(&'a str),
}

impl<'a> ProductKey<'a> {
    pub fn parse(term: &'a str) -> Self {
        if term.len() == CANONICAL_UUID_LEN
            && let Ok(id) = Uuid::try_parse(term)
        {
            return ProductKey::Id(id);
        }
        ProductKey::Term(term)
    }
}

/// Input for creating a product together with its images.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateProduct {
    pub title: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub sizes: Vec<String>,
    pub gender: Gender,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Image URLs, one owned image row each.
    #[serde(default)]
    pub images: Vec<String>,
}

impl CreateProduct {
    /// Check field-level constraints that the storage layer does not enforce.
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_price(self.price)?;
        validate_stock(self.stock)?;
        Ok(())
    }
}

/// Partial update. Absent fields keep their stored values; `images`, when
/// present, replaces the whole image set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProduct {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub stock: Option<i32>,
    pub sizes: Option<Vec<String>>,
    pub gender: Option<Gender>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

impl UpdateProduct {
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::InvalidProduct("title must not be empty".to_string()));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::InvalidProduct(format!(
            "price must be a non-negative number, got {price}"
        )));
    }
    Ok(())
}

fn validate_stock(stock: i32) -> Result<()> {
    if stock < 0 {
        return Err(Error::InvalidProduct(format!(
            "stock must be non-negative, got {stock}"
        )));
    }
    Ok(())
}

/// Product as returned to API callers, with images flattened to URLs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    pub slug: String,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub gender: Gender,
    pub tags: Vec<String>,
    pub images: Vec<String>,
}

/// Listing window.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pagination {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl Pagination {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(crate::DEFAULT_PAGE_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(crate::DEFAULT_PAGE_OFFSET)
    }

    pub fn validate(&self) -> Result<()> {
        if self.limit == Some(0) {
            return Err(Error::InvalidPagination(
                "limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
