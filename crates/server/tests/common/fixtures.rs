//! Test fixtures for generating product data.

use serde_json::{Value, json};
use storefront_core::{CreateProduct, Gender};

/// Build a create input with the given title and images.
#[allow(dead_code)]
pub fn product_input(title: &str, images: &[&str]) -> CreateProduct {
    CreateProduct {
        title: title.to_string(),
        price: 25.0,
        description: Some(format!("{title} description")),
        slug: None,
        stock: 5,
        sizes: vec!["S".to_string(), "M".to_string()],
        gender: Gender::Unisex,
        tags: vec!["shirt".to_string()],
        images: images.iter().map(|s| s.to_string()).collect(),
    }
}

/// JSON body for `POST /api/products`.
#[allow(dead_code)]
pub fn product_json(title: &str, images: &[&str]) -> Value {
    json!({
        "title": title,
        "price": 25.0,
        "stock": 5,
        "sizes": ["S", "M"],
        "gender": "men",
        "tags": ["shirt"],
        "images": images,
    })
}

/// Small, deterministic PNG-like payload.
#[allow(dead_code)]
pub fn image_bytes(len: usize) -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    data.extend((0..len).map(|i| (i % 251) as u8));
    data
}

/// Build a `multipart/form-data` body with a single file part.
///
/// Returns the content type header value and the encoded body.
#[allow(dead_code)]
pub fn multipart_body(field: &str, file_name: &str, data: &[u8]) -> (String, Vec<u8>) {
    let boundary = "storefront-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}
