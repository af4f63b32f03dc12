//! Durability tests: file-backed slots, reloads, corrupt documents.

use super::{test_store_with, T0};
use crate::clock::FixedClock;
use crate::{Collection, Document, DocumentStore, StoreError, StoreOptions};
use hrm_config_and_utils::CorruptDocumentPolicy;
use serde_json::json;
use slot_storage::{FileSlotStorage, SlotStorage, StorageKeys};
use std::sync::Arc;
use tempfile::TempDir;

fn file_store(dir: &TempDir) -> DocumentStore {
    let storage = FileSlotStorage::new(dir.path()).unwrap();
    DocumentStore::with_clock(
        Arc::new(storage),
        StoreOptions::default(),
        Arc::new(FixedClock::new(T0)),
    )
}

#[test]
fn writes_survive_reopening() {
    let dir = TempDir::new().unwrap();
    {
        let store = file_store(&dir);
        store
            .from(Collection::Profiles)
            .insert(json!({"id": "p1", "email": "a@x.com", "full_name": "A"}))
            .unwrap();
    }

    let reopened = file_store(&dir);
    let found = reopened
        .from(Collection::Profiles)
        .select("*")
        .eq("id", "p1")
        .single()
        .unwrap();
    assert_eq!(found.unwrap()["email"], "a@x.com");
}

#[test]
fn document_lives_in_one_slot_file() {
    let dir = TempDir::new().unwrap();
    let store = file_store(&dir);
    store.load().unwrap();

    let path = dir.path().join("hrm_database.json");
    let text = std::fs::read_to_string(path).unwrap();
    let parsed = Document::parse(&text).unwrap();
    assert_eq!(parsed, Document::empty());
}

#[test]
fn two_handles_on_one_directory_see_each_other() {
    let dir = TempDir::new().unwrap();
    let a = file_store(&dir);
    let b = file_store(&dir);

    a.from(Collection::Tasks).insert(json!({"id": "t1"})).unwrap();
    b.from(Collection::Tasks).insert(json!({"id": "t2"})).unwrap();

    assert_eq!(a.load().unwrap().records(Collection::Tasks).len(), 2);
}

#[test]
fn corrupt_document_is_reinitialized_by_default() {
    let (store, storage) = test_store_with(StoreOptions::default());
    storage.set(StorageKeys::DATABASE, "{not json").unwrap();

    let doc = store.load().unwrap();
    assert_eq!(doc, Document::empty());
    let persisted = storage.get(StorageKeys::DATABASE).unwrap().unwrap();
    assert_eq!(Document::parse(&persisted).unwrap(), Document::empty());
}

#[test]
fn wrongly_shaped_document_counts_as_corrupt() {
    let (store, storage) = test_store_with(StoreOptions::default());
    storage
        .set(StorageKeys::DATABASE, r#"{"profiles": "everyone"}"#)
        .unwrap();
    assert_eq!(store.load().unwrap(), Document::empty());
}

#[test]
fn corrupt_document_fails_under_fail_policy() {
    let (store, storage) = test_store_with(StoreOptions {
        corrupt_document_policy: CorruptDocumentPolicy::Fail,
        ..StoreOptions::default()
    });
    storage.set(StorageKeys::DATABASE, "garbage").unwrap();

    let err = store.load().unwrap_err();
    assert!(matches!(err, StoreError::StorageUnavailable(_)));
    assert!(store.from(Collection::Tasks).insert(json!({})).is_err());
    assert_eq!(storage.get(StorageKeys::DATABASE).unwrap().as_deref(), Some("garbage"));
}

#[test]
fn missing_known_collections_are_filled_in() {
    let (store, storage) = test_store_with(StoreOptions::default());
    storage
        .set(StorageKeys::DATABASE, r#"{"profiles": [{"id": "p1"}]}"#)
        .unwrap();

    let doc = store.load().unwrap();
    assert_eq!(doc.records(Collection::Profiles).len(), 1);
    for collection in Collection::ALL {
        assert!(doc.collection_names().any(|n| n == collection.as_str()));
    }
}

#[test]
fn save_replaces_the_whole_document() {
    let (store, _) = test_store_with(StoreOptions::default());
    store.from(Collection::Tasks).insert(json!({"id": "t1"})).unwrap();

    let mut replacement = Document::empty();
    replacement
        .records_mut(Collection::Meetings)
        .push(json!({"id": "m1"}).as_object().cloned().unwrap());
    store.save(&replacement).unwrap();

    let doc = store.load().unwrap();
    assert!(doc.records(Collection::Tasks).is_empty());
    assert_eq!(doc.records(Collection::Meetings).len(), 1);
}
