//! Integration tests for the file-system backend.

use confvault_store::{ConfigStore, FileStore, StoredRecord};
use tempfile::TempDir;

async fn open_store() -> (TempDir, FileStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    store.open().await.unwrap();
    (dir, store)
}

#[tokio::test]
async fn upsert_then_find() {
    let (_dir, store) = open_store().await;
    let doc = r#"{"id":"testConfiguration","variation":"","test":"blabla"}"#;

    store
        .upsert(StoredRecord::new("testConfiguration", None, doc))
        .await
        .unwrap();

    let record = store
        .find_one("testConfiguration", "")
        .await
        .unwrap()
        .expect("record should exist");
    assert_eq!(record.id(), "testConfiguration");
    assert_eq!(record.variation(), "");
    assert_eq!(record.document(), doc);
}

#[tokio::test]
async fn upsert_replaces_existing_record() {
    let (dir, store) = open_store().await;

    store
        .upsert(StoredRecord::new("cfg1", Some("A"), "first"))
        .await
        .unwrap();
    store
        .upsert(StoredRecord::new("cfg1", Some("A"), "second"))
        .await
        .unwrap();

    let record = store.find_one("cfg1", "A").await.unwrap().unwrap();
    assert_eq!(record.document(), "second");

    // No temp files left behind
    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn variations_are_separate_records() {
    let (_dir, store) = open_store().await;

    store
        .upsert(StoredRecord::new("cfg1", Some("A"), "aaa"))
        .await
        .unwrap();
    store
        .upsert(StoredRecord::new("cfg1", Some("B"), "bbb"))
        .await
        .unwrap();

    assert_eq!(
        store.find_one("cfg1", "A").await.unwrap().unwrap().document(),
        "aaa"
    );
    assert_eq!(
        store.find_one("cfg1", "B").await.unwrap().unwrap().document(),
        "bbb"
    );
    assert!(store.find_one("cfg1", "").await.unwrap().is_none());
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (_dir, store) = open_store().await;

    store
        .upsert(StoredRecord::new("cfg1", None, "{}"))
        .await
        .unwrap();

    assert!(store.delete("cfg1", "").await.unwrap());
    assert!(!store.delete("cfg1", "").await.unwrap());
    assert!(store.find_one("cfg1", "").await.unwrap().is_none());
}

#[tokio::test]
async fn records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = FileStore::new(dir.path());
        store.open().await.unwrap();
        store
            .upsert(StoredRecord::new("payments", Some("eu"), "{}"))
            .await
            .unwrap();
        store.close().await.unwrap();
    }

    let store = FileStore::new(dir.path());
    store.open().await.unwrap();
    assert!(store.find_one("payments", "eu").await.unwrap().is_some());
}

#[tokio::test]
async fn ids_with_path_characters_stay_inside_data_dir() {
    let (dir, store) = open_store().await;

    store
        .upsert(StoredRecord::new("../escape/cfg", Some("a/b"), "{}"))
        .await
        .unwrap();

    let path = store.record_path("../escape/cfg", "a/b");
    assert_eq!(path.parent(), Some(dir.path()));
    assert!(store.find_one("../escape/cfg", "a/b").await.unwrap().is_some());
}
