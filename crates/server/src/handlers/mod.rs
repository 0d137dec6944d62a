//! HTTP request handlers.

pub mod common;
pub mod files;
pub mod health;
pub mod products;
pub mod seed;

pub use files::{get_product_image, upload_product_image};
pub use health::health_check;
pub use products::{create_product, delete_product, get_product, list_products, update_product};
pub use seed::run_seed;
