//! Write-path tests: insert, update, delete, upsert and key policies.

use super::{id_of, test_store, test_store_with};
use crate::{Collection, StoreError, StoreOptions, UpsertOptions};
use hrm_config_and_utils::DuplicateKeyPolicy;
use serde_json::json;

fn reject_duplicates() -> StoreOptions {
    StoreOptions {
        duplicate_key_policy: DuplicateKeyPolicy::Reject,
        ..StoreOptions::default()
    }
}

#[test]
fn insert_generates_id_and_created_at() {
    let store = test_store();
    let rows = store
        .from(Collection::Attendance)
        .insert(json!({"employee_id": "p1", "date": "2024-03-01", "status": "present"}))
        .unwrap();
    let id = id_of(&rows[0]);
    assert!(id.starts_with("attendance_1700000000000_"), "{}", id);
    assert_eq!(rows[0]["created_at"], "2023-11-14T22:13:20.001Z");
    assert!(!rows[0].contains_key("updated_at"));
}

#[test]
fn insert_keeps_caller_id_and_created_at() {
    let store = test_store();
    let rows = store
        .from(Collection::Messages)
        .insert(json!({"id": "m1", "created_at": "2020-01-01T00:00:00.000Z", "subject": "hi"}))
        .unwrap();
    assert_eq!(rows[0]["id"], "m1");
    assert_eq!(rows[0]["created_at"], "2020-01-01T00:00:00.000Z");
}

#[test]
fn insert_preserves_batch_order_and_appends() {
    let store = test_store();
    store.from(Collection::Tasks).insert(json!({"id": "t0"})).unwrap();
    store
        .from(Collection::Tasks)
        .insert(json!([{"id": "t1"}, {"id": "t2"}]))
        .unwrap();
    let ids: Vec<String> = store
        .load()
        .unwrap()
        .records(Collection::Tasks)
        .iter()
        .map(id_of)
        .collect();
    assert_eq!(ids, vec!["t0", "t1", "t2"]);
}

#[test]
fn insert_rejects_wrongly_typed_fields() {
    let store = test_store();
    let err = store
        .from(Collection::Evaluations)
        .insert(json!({"employee_id": "p1", "score": "great"}))
        .unwrap_err();
    assert!(matches!(err, StoreError::MalformedInput(_)));
    assert_eq!(err.code(), "malformed_input");
}

#[test]
fn update_merges_and_stamps_updated_at() {
    let store = test_store();
    store
        .from(Collection::Tasks)
        .insert(json!([
            {"id": "t1", "assigned_to": "p1", "status": "todo", "priority": "low"},
            {"id": "t2", "assigned_to": "p1", "status": "todo", "priority": "high"},
            {"id": "t3", "assigned_to": "p2", "status": "todo", "priority": "low"},
        ]))
        .unwrap();

    let updated = store
        .from(Collection::Tasks)
        .update(json!({"status": "doing", "created_at": "ignored"}))
        .eq("assigned_to", "p1")
        .unwrap();

    assert_eq!(updated.len(), 2);
    for row in &updated {
        assert_eq!(row["status"], "doing");
        assert!(row["updated_at"].is_string());
        assert_ne!(row["created_at"], "ignored");
    }
    assert_eq!(updated[1]["priority"], "high");

    let untouched = store
        .from(Collection::Tasks)
        .select("*")
        .eq("id", "t3")
        .single()
        .unwrap()
        .unwrap();
    assert!(!untouched.contains_key("updated_at"));
}

#[test]
fn update_rewriting_the_filter_column_returns_nothing_but_persists() {
    let store = test_store();
    store
        .from(Collection::Tasks)
        .insert(json!([
            {"id": "t1", "status": "open"},
            {"id": "t2", "status": "closed"},
        ]))
        .unwrap();

    let updated = store
        .from(Collection::Tasks)
        .update(json!({"status": "done"}))
        .eq("status", "open")
        .unwrap();
    assert!(updated.is_empty());

    let t1 = store
        .from(Collection::Tasks)
        .select("*")
        .eq("id", "t1")
        .single()
        .unwrap()
        .unwrap();
    assert_eq!(t1["status"], "done");
    assert!(t1["updated_at"].is_string());
    assert!(store
        .from(Collection::Tasks)
        .select("*")
        .eq("status", "open")
        .execute()
        .unwrap()
        .is_empty());
}

#[test]
fn update_without_match_returns_empty() {
    let store = test_store();
    let updated = store
        .from(Collection::Tasks)
        .update(json!({"status": "x"}))
        .eq("id", "missing")
        .unwrap();
    assert!(updated.is_empty());
}

#[test]
fn delete_then_select_is_empty() {
    let store = test_store();
    store
        .from(Collection::Messages)
        .insert(json!([
            {"id": "m1", "from_user": "p1"},
            {"id": "m2", "from_user": "p2"},
            {"id": "m3", "from_user": "p1"},
        ]))
        .unwrap();

    store.from(Collection::Messages).delete().eq("from_user", "p1").unwrap();

    let rows = store
        .from(Collection::Messages)
        .select("*")
        .eq("from_user", "p1")
        .execute()
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(store.load().unwrap().records(Collection::Messages).len(), 1);

    // Deleting nothing is not an error.
    store.from(Collection::Messages).delete().eq("from_user", "p9").unwrap();
}

#[test]
fn upsert_by_id_inserts_then_merges() {
    let store = test_store();
    let first = store
        .from(Collection::Profiles)
        .upsert(json!({"id": "p1", "email": "a@x.com", "full_name": "A"}), UpsertOptions::default())
        .unwrap();
    assert_eq!(first["created_at"], "2023-11-14T22:13:20.000Z");
    assert!(!first.contains_key("updated_at"));

    let second = store
        .from(Collection::Profiles)
        .upsert(json!({"id": "p1", "department": "eng"}), UpsertOptions::default())
        .unwrap();
    assert_eq!(second["email"], "a@x.com");
    assert_eq!(second["department"], "eng");
    assert_eq!(second["created_at"], first["created_at"]);
    assert!(second["updated_at"].is_string());
    assert_eq!(store.load().unwrap().records(Collection::Profiles).len(), 1);
}

#[test]
fn upsert_is_idempotent_apart_from_updated_at() {
    let store = test_store();
    let record = json!({"user_id": "u1", "role": "manager"});
    let options = UpsertOptions::on_conflict("user_id");

    store.from(Collection::UserRoles).upsert(record.clone(), options.clone()).unwrap();
    let mut once = store.load().unwrap().records(Collection::UserRoles).to_vec();
    store.from(Collection::UserRoles).upsert(record, options).unwrap();
    let mut twice = store.load().unwrap().records(Collection::UserRoles).to_vec();

    assert_eq!(twice.len(), 1);
    once[0].remove("updated_at");
    twice[0].remove("updated_at");
    assert_eq!(once, twice);
}

#[test]
fn upsert_on_user_id_keeps_one_record_per_user() {
    let store = test_store();
    let roles = store.from(Collection::UserRoles);
    roles
        .upsert(json!({"user_id": "u1", "role": "admin"}), UpsertOptions::on_conflict("user_id"))
        .unwrap();
    roles
        .upsert(json!({"user_id": "u2", "role": "employee"}), UpsertOptions::on_conflict("user_id"))
        .unwrap();
    roles
        .upsert(json!({"user_id": "u1", "role": "hr"}), UpsertOptions::on_conflict("user_id"))
        .unwrap();

    let rows = store
        .from(Collection::UserRoles)
        .select("*")
        .eq("user_id", "u1")
        .execute()
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["role"], "hr");
}

#[test]
fn upsert_with_absent_conflict_field_matches_record_lacking_it() {
    let store = test_store();
    let roles = store.from(Collection::UserRoles);
    roles
        .upsert(json!({"id": "u1", "role": "admin"}), UpsertOptions::on_conflict("user_id"))
        .unwrap();
    roles
        .upsert(json!({"id": "u1", "role": "hr"}), UpsertOptions::on_conflict("user_id"))
        .unwrap();

    let rows = store.load().unwrap().records(Collection::UserRoles).to_vec();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], "u1");
    assert_eq!(rows[0]["role"], "hr");
}

#[test]
fn absent_conflict_field_never_matches_null() {
    let store = test_store();
    store
        .from(Collection::Tasks)
        .insert(json!({"id": "t1", "due_date": null}))
        .unwrap();
    store
        .from(Collection::Tasks)
        .upsert(json!({"id": "t2"}), UpsertOptions::on_conflict("due_date"))
        .unwrap();
    assert_eq!(store.load().unwrap().records(Collection::Tasks).len(), 2);
}

#[test]
fn upsert_merges_only_the_first_match() {
    let store = test_store();
    store
        .from(Collection::Tasks)
        .insert(json!([
            {"id": "t1", "assigned_to": "p1", "status": "todo"},
            {"id": "t2", "assigned_to": "p1", "status": "todo"},
        ]))
        .unwrap();
    let merged = store
        .from(Collection::Tasks)
        .upsert(json!({"assigned_to": "p1", "status": "done"}), UpsertOptions::on_conflict("assigned_to"))
        .unwrap();
    assert_eq!(merged["id"], "t1");
    let doc = store.load().unwrap();
    assert_eq!(doc.records(Collection::Tasks)[1]["status"], "todo");
}

#[test]
fn reject_policy_refuses_taken_ids() {
    let (store, _) = test_store_with(reject_duplicates());
    store.from(Collection::Profiles).insert(json!({"id": "p1"})).unwrap();

    let err = store.from(Collection::Profiles).insert(json!({"id": "p1"})).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { ref field, ref value, .. } if field == "id" && value == "p1"));

    let err = store
        .from(Collection::Profiles)
        .insert(json!([{"id": "p2"}, {"id": "p2"}]))
        .unwrap_err();
    assert_eq!(err.code(), "duplicate_key");
    assert_eq!(store.load().unwrap().records(Collection::Profiles).len(), 1);
}

#[test]
fn reject_policy_refuses_ambiguous_upserts() {
    let (store, _) = test_store_with(reject_duplicates());
    store
        .from(Collection::UserRoles)
        .insert(json!([
            {"user_id": "u1", "role": "admin"},
            {"user_id": "u1", "role": "hr"},
        ]))
        .unwrap();

    let err = store
        .from(Collection::UserRoles)
        .upsert(json!({"user_id": "u1", "role": "manager"}), UpsertOptions::on_conflict("user_id"))
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { .. }));

    let err = store
        .from(Collection::UserRoles)
        .upsert(json!({"role": "manager"}), UpsertOptions::on_conflict("user_id"))
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { .. }));
}

#[test]
fn allow_policy_accepts_duplicate_ids() {
    let store = test_store();
    store.from(Collection::Tasks).insert(json!({"id": "t1"})).unwrap();
    store.from(Collection::Tasks).insert(json!({"id": "t1"})).unwrap();
    assert_eq!(store.load().unwrap().records(Collection::Tasks).len(), 2);
}

#[test]
fn extra_fields_are_kept() {
    let store = test_store();
    let rows = store
        .from(Collection::Profiles)
        .insert(json!({"email": "a@x.com", "full_name": "A", "nickname": "al", "tags": ["x"]}))
        .unwrap();
    let stored = store
        .from(Collection::Profiles)
        .select("*")
        .eq("id", id_of(&rows[0]).as_str())
        .single()
        .unwrap()
        .unwrap();
    assert_eq!(stored["tags"], json!(["x"]));
    assert_eq!(stored["nickname"], "al");
}
