mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use confvault_store::{ConfigStore, FileStore};
use helpers::{client, client_with_store};
use serde_json::Value;

#[tokio::test]
async fn health_check_returns_up() {
    let response = client().get("/health").await;

    response.assert_status(StatusCode::OK);
    assert!(
        response
            .header("content-type")
            .unwrap()
            .contains("application/json")
    );

    let body: Value = response.json();
    assert_eq!(body["status"], "UP");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn health_check_reports_down_store() {
    let dir = tempfile::tempdir().unwrap();
    let response = client_with_store(Arc::new(FileStore::new(dir.path())))
        .get("/health")
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = response.json();
    assert_eq!(body["status"], "DOWN");
    assert_eq!(body["store"], "file");
    assert!(body["error"].as_str().unwrap().contains("not open"));
}

#[tokio::test]
async fn health_check_up_once_store_opened() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::new(dir.path()));
    store.open().await.unwrap();

    client_with_store(store)
        .get("/health")
        .await
        .assert_status(StatusCode::OK);
}
