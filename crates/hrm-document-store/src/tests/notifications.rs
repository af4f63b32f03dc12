//! Observer tests.
//!
//! Every successful mutation notifies each observer exactly once, after the
//! write is persisted. Failed operations and reads notify nobody.

use super::test_store;
use crate::{ChangeScope, Collection, Document, RecordingListener, SignUpOptions, UpsertOptions};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

#[test]
fn each_mutation_notifies_with_its_collection() {
    let store = test_store();
    let recorder = RecordingListener::new();
    let _sub = recorder.attach(store.notifier());

    store.from(Collection::Tasks).insert(json!({"id": "t1"})).unwrap();
    store
        .from(Collection::Tasks)
        .update(json!({"status": "done"}))
        .eq("id", "t1")
        .unwrap();
    store
        .from(Collection::UserRoles)
        .upsert(json!({"user_id": "u1", "role": "hr"}), UpsertOptions::on_conflict("user_id"))
        .unwrap();
    store.from(Collection::Tasks).delete().eq("id", "t1").unwrap();

    assert_eq!(
        recorder.scopes(),
        vec![
            ChangeScope::Collection(Collection::Tasks),
            ChangeScope::Collection(Collection::Tasks),
            ChangeScope::Collection(Collection::UserRoles),
            ChangeScope::Collection(Collection::Tasks),
        ]
    );
}

#[test]
fn empty_matches_still_notify() {
    let store = test_store();
    let recorder = RecordingListener::new();
    let _sub = recorder.attach(store.notifier());

    store
        .from(Collection::Tasks)
        .update(json!({"status": "x"}))
        .eq("id", "none")
        .unwrap();
    store.from(Collection::Tasks).delete().eq("id", "none").unwrap();
    assert_eq!(recorder.len(), 2);
}

#[test]
fn failed_operations_do_not_notify() {
    let store = test_store();
    let recorder = RecordingListener::new();
    let _sub = recorder.attach(store.notifier());

    assert!(store.from(Collection::Tasks).insert(json!("nope")).is_err());
    assert!(store.import_from_json("[1,2]").is_err());
    assert!(store.auth().sign_in_with_password("ghost@x.com", "pw").is_err());
    assert!(recorder.is_empty());
}

#[test]
fn session_and_document_operations_notify_any() {
    let store = test_store();
    let recorder = RecordingListener::new();
    let _sub = recorder.attach(store.notifier());

    store
        .auth()
        .sign_up("a@x.com", "pw", SignUpOptions::default())
        .unwrap();
    store.auth().sign_out();
    store.save(&Document::empty()).unwrap();
    store.import_from_json("{}").unwrap();

    assert_eq!(recorder.scopes(), vec![ChangeScope::Any; 4]);
}

#[test]
fn all_observers_called_in_subscription_order() {
    let store = test_store();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let subs: Vec<_> = (0..3)
        .map(|n| {
            let calls = Arc::clone(&calls);
            store.subscribe(move |_| calls.lock().push(n))
        })
        .collect();

    store.from(Collection::Meetings).insert(json!({"title": "x"})).unwrap();
    assert_eq!(*calls.lock(), vec![0, 1, 2]);
    drop(subs);

    store.from(Collection::Meetings).insert(json!({"title": "y"})).unwrap();
    assert_eq!(calls.lock().len(), 3);
}

#[test]
fn observer_can_read_the_store_it_observes() {
    let store = test_store();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let reader = store.clone();
    let seen_in = Arc::clone(&seen);
    let _sub = store.subscribe(move |scope| {
        if scope.affects(Collection::Tasks) {
            let count = reader.from(Collection::Tasks).select("id").execute().unwrap().len();
            seen_in.lock().push(count);
        }
    });

    store.from(Collection::Tasks).insert(json!({"id": "t1"})).unwrap();
    store.from(Collection::Tasks).insert(json!({"id": "t2"})).unwrap();
    assert_eq!(*seen.lock(), vec![1, 2]);
}
