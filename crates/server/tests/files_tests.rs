//! Integration tests for product image upload and download.

mod common;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use common::fixtures::{image_bytes, multipart_body, product_json};
use common::{TEST_HOST_API, TestServer, send};
use serde_json::Value;

async fn upload(server: &TestServer, field: &str, file_name: &str, data: &[u8]) -> (StatusCode, Value) {
    let (content_type, body) = multipart_body(field, file_name, data);
    let request = Request::builder()
        .method("POST")
        .uri("/api/files/product")
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap();

    let (status, _, bytes) = send(&server.router, request).await;
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn download(server: &TestServer, name: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let request = Request::builder()
        .uri(format!("/api/files/product/{name}"))
        .body(Body::empty())
        .unwrap();
    let (status, headers, bytes) = send(&server.router, request).await;
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    (status, content_type, bytes.to_vec())
}

fn storage_name(secure_url: &str) -> &str {
    secure_url
        .strip_prefix(&format!("{TEST_HOST_API}/files/product/"))
        .expect("secure url should point at the file endpoint")
}

#[tokio::test]
async fn test_upload_then_download() {
    let server = TestServer::new().await;
    let data = image_bytes(200 * 1024);

    let (status, body) = upload(&server, "file", "Photo.PNG", &data).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let secure_url = body["secureUrl"].as_str().unwrap().to_string();
    let name = storage_name(&secure_url);
    assert!(name.starts_with("file-"));
    assert!(name.ends_with(".PNG"));

    let (status, content_type, bytes) = download(&server, name).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    assert_eq!(bytes, data);
}

#[tokio::test]
async fn test_uploaded_url_can_be_attached_to_product() {
    let server = TestServer::new().await;

    let (_, body) = upload(&server, "file", "front.jpg", &image_bytes(64)).await;
    let secure_url = body["secureUrl"].as_str().unwrap().to_string();

    let (status, product) = server
        .json(
            "POST",
            "/api/products",
            Some(product_json("Uploaded Tee", &[&secure_url])),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product["images"][0], secure_url);
}

#[tokio::test]
async fn test_upload_rejects_disallowed_extension() {
    let server = TestServer::new().await;

    for file_name in ["notes.txt", "photo", "photo.jpg.exe"] {
        let (status, body) = upload(&server, "file", file_name, b"data").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "file {file_name}");
        assert_eq!(body["code"], "invalid_upload");
    }
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let server = TestServer::new().await;

    let (status, body) = upload(&server, "avatar", "photo.png", b"data").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_upload");

    // Not a multipart request at all.
    let (status, body) = server.json("POST", "/api/files/product", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_upload");
}

#[tokio::test]
async fn test_download_missing_image() {
    let server = TestServer::new().await;

    let (status, _, bytes) = download(&server, "file-1-1.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Image file-1-1.png not found");
}

#[tokio::test]
async fn test_download_rejects_traversal() {
    let server = TestServer::new().await;

    let (status, _, _) = download(&server, "..%2Fcatalog.db").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_over_body_limit_is_rejected() {
    let server = TestServer::with_config(|config| config.server.max_upload_bytes = 1024).await;

    let (status, _) = upload(&server, "file", "big.png", &image_bytes(8 * 1024)).await;
    assert!(status.is_client_error(), "got {status}");
}
