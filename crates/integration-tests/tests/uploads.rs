//! Integration tests for the image upload batch.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::Ordering;

use vesta_integration_tests::{image_file, spawn_backend};

#[tokio::test]
async fn batch_results_keep_input_order_under_reversed_completion() {
    let backend = spawn_backend(Vec::new()).await;
    let client = backend.client();

    // The mock delays each upload inversely to its trailing digit, so
    // img-5 completes first and img-0 last.
    let files: Vec<_> = (0..6).map(|i| image_file(&format!("img-{i}"))).collect();

    let names = client.upload_images(files).await.unwrap();

    assert_eq!(
        names,
        vec!["img-0", "img-1", "img-2", "img-3", "img-4", "img-5"]
    );
    assert_eq!(backend.state.counters.upload.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn empty_batch_resolves_without_network() {
    let backend = spawn_backend(Vec::new()).await;
    let client = backend.client();

    let names = client.upload_images(Vec::new()).await.unwrap();

    assert!(names.is_empty());
    assert_eq!(backend.state.counters.upload.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn one_failure_fails_the_whole_batch() {
    let backend = spawn_backend(Vec::new()).await;
    let client = backend.client();

    let files = vec![
        image_file("img-0"),
        image_file("img-fail"),
        image_file("img-2"),
    ];

    let err = client.upload_images(files).await.unwrap_err();

    // The batch surfaces the rejection; no partial result exists.
    assert!(err.to_string().contains("upload rejected"));
}
