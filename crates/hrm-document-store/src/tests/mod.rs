//! Engine-level tests for the document store.
//!
//! - `queries.rs`       - select, filter, order, limit, projection
//! - `mutations.rs`     - insert, update, delete, upsert, key policies
//! - `notifications.rs` - observer fan-out per operation
//! - `persistence.rs`   - file-backed slots, corrupt documents, reload
//! - `auth.rs`          - sign-up, sign-in, sign-out, session
//! - `transfer.rs`      - export and import
//! - `provisioning.rs`  - employee creation and evaluations
//! - `failures.rs`      - slot backends that fail

mod mutations;
mod notifications;
mod persistence;

use crate::clock::FixedClock;
use crate::{Collection, DocumentStore, Record, RecordingListener, StoreOptions};
use serde_json::{json, Value};
use slot_storage::MemorySlotStorage;
use std::sync::Arc;

/// 2023-11-14T22:13:20.000Z
pub(crate) const T0: u64 = 1_700_000_000_000;

pub(crate) fn test_store() -> DocumentStore {
    test_store_with(StoreOptions::default()).0
}

pub(crate) fn test_store_with(options: StoreOptions) -> (DocumentStore, Arc<MemorySlotStorage>) {
    let storage = Arc::new(MemorySlotStorage::new());
    let store = DocumentStore::with_clock(storage.clone(), options, Arc::new(FixedClock::new(T0)));
    (store, storage)
}

pub(crate) fn obj(value: Value) -> Record {
    value.as_object().cloned().expect("test record must be an object")
}

pub(crate) fn id_of(record: &Record) -> String {
    record["id"].as_str().expect("record has a string id").to_string()
}

/// Basic workflow test demonstrating core functionality.
#[test]
fn basic_workflow() {
    let store = test_store();
    let recorder = RecordingListener::new();
    let _sub = recorder.attach(store.notifier());

    // Insert
    let inserted = store
        .from(Collection::Tasks)
        .insert(json!([
            {"title": "Write report", "assigned_to": "p1", "assigned_by": "p2", "status": "todo", "priority": "high"},
            {"title": "Review PR", "assigned_to": "p1", "assigned_by": "p2", "status": "todo", "priority": "low"},
        ]))
        .unwrap();
    assert_eq!(inserted.len(), 2);

    // Read back
    let todo = store
        .from(Collection::Tasks)
        .select("*")
        .eq("status", "todo")
        .order("priority", true)
        .execute()
        .unwrap();
    assert_eq!(todo.len(), 2);
    assert_eq!(todo[0]["title"], "Write report");

    // Update one
    let first = id_of(&inserted[0]);
    let updated = store
        .from(Collection::Tasks)
        .update(json!({"status": "done"}))
        .eq("id", first.as_str())
        .unwrap();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0]["status"], "done");

    // Delete the other
    let second = id_of(&inserted[1]);
    store.from(Collection::Tasks).delete().eq("id", second.as_str()).unwrap();
    let remaining = store.from(Collection::Tasks).select("*").execute().unwrap();
    assert_eq!(remaining.len(), 1);

    // One notification per mutation
    assert_eq!(recorder.len(), 3);
}
