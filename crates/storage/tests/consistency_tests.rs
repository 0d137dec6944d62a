// Consistency tests for concurrent writes and reads against the filesystem
// asset store.

use bytes::Bytes;
use futures::StreamExt;
use std::sync::Arc;
use storefront_storage::{AssetStore, FilesystemBackend};
use tempfile::TempDir;

async fn collect(store: &dyn AssetStore, name: &str) -> Vec<u8> {
    let mut stream = store.get_stream(name).await.unwrap();
    let mut data = Vec::new();
    while let Some(chunk) = stream.next().await {
        data.extend_from_slice(&chunk.unwrap());
    }
    data
}

#[tokio::test]
async fn test_concurrent_puts_to_distinct_names() {
    let temp_dir = TempDir::new().unwrap();
    let store: Arc<dyn AssetStore> = Arc::new(FilesystemBackend::new(temp_dir.path()).await.unwrap());

    let handles: Vec<_> = (0..32u8)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .put(&format!("file-{i}.png"), Bytes::from(vec![i; 1024]))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for i in 0..32u8 {
        assert_eq!(collect(store.as_ref(), &format!("file-{i}.png")).await, vec![i; 1024]);
    }

    // Only final files remain; no temp files leaked.
    let entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
    assert_eq!(entries, 32);
}

#[tokio::test]
async fn test_concurrent_overwrites_leave_one_complete_version() {
    let temp_dir = TempDir::new().unwrap();
    let store: Arc<dyn AssetStore> = Arc::new(FilesystemBackend::new(temp_dir.path()).await.unwrap());

    let handles: Vec<_> = (1..=8u8)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .put("shared.jpg", Bytes::from(vec![i; 256 * 1024]))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let data = collect(store.as_ref(), "shared.jpg").await;
    assert_eq!(data.len(), 256 * 1024);
    let first = data[0];
    assert!((1..=8).contains(&first));
    assert!(data.iter().all(|b| *b == first), "torn write observed");
}

#[tokio::test]
async fn test_reader_sees_complete_file_during_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let store: Arc<dyn AssetStore> = Arc::new(FilesystemBackend::new(temp_dir.path()).await.unwrap());
    store
        .put("photo.gif", Bytes::from(vec![1u8; 128 * 1024]))
        .await
        .unwrap();

    let writer = {
        let store = store.clone();
        tokio::spawn(async move {
            for round in 2..10u8 {
                store
                    .put("photo.gif", Bytes::from(vec![round; 128 * 1024]))
                    .await
                    .unwrap();
            }
        })
    };

    for _ in 0..10 {
        let data = collect(store.as_ref(), "photo.gif").await;
        assert_eq!(data.len(), 128 * 1024);
        assert!(data.iter().all(|b| *b == data[0]));
    }
    writer.await.unwrap();
}
