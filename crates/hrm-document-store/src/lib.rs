//! # HRM document store
//!
//! An embedded persistence layer for the HR application: one JSON document
//! holding every collection, stored in a key-value slot, with a relational
//! style query builder and session-based auth on top.
//!
//! ## Architecture
//!
//! ```text
//! WRITE:
//!   lock → load document → change one collection → save document → unlock → notify
//!
//! READ:
//!   lock → load document → filter → sort → limit → project
//!
//! AUTH:
//!   profiles + user_roles (document) | credentials slot | current_user slot
//! ```
//!
//! ## Example
//!
//! ```rust
//! use hrm_document_store::{Collection, DocumentStore, UpsertOptions};
//! use serde_json::json;
//!
//! let store = DocumentStore::in_memory();
//!
//! let inserted = store
//!     .from(Collection::Profiles)
//!     .insert(json!({"email": "a@x.com", "full_name": "A"}))
//!     .unwrap();
//! let id = inserted[0]["id"].as_str().unwrap().to_string();
//!
//! store
//!     .from(Collection::UserRoles)
//!     .upsert(json!({"user_id": id, "role": "admin"}), UpsertOptions::on_conflict("user_id"))
//!     .unwrap();
//!
//! let signed_in = store.auth().sign_in_with_password("a@x.com", "anything").unwrap();
//! assert_eq!(signed_in.user["role"], "admin");
//! ```
//!
//! ## Crate Structure
//!
//! - [`store`] - Document load/save, operation lock, notification fan-out
//! - [`builder`] - Fluent select/insert/update/delete/upsert per collection
//! - [`query`] - Filter, ordering and projection value objects
//! - [`auth`] - Sign-up, sign-in, sign-out, session
//! - [`notify`] - Change observers
//! - [`transfer`] - Export and import of the whole document

pub mod auth;
pub mod builder;
mod clock;
mod collection;
mod document;
mod error;
pub mod evaluations;
pub mod models;
pub mod notify;
pub mod provisioning;
pub mod query;
mod record;
mod response;
pub mod store;
pub mod transfer;

#[cfg(test)]
mod tests;

pub use auth::{Auth, AuthResponse, Session, SignUpOptions};
pub use builder::{CollectionRef, DeleteBuilder, SelectBuilder, UpdateBuilder, UpsertOptions};
#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;
pub use clock::{format_millis, Clock, SystemClock};
pub use collection::Collection;
pub use document::Document;
pub use error::{StoreError, StoreResult};
pub use evaluations::NewEvaluation;
pub use models::{CategoryScores, Evaluation, Profile, Role, UserRoleAssignment};
pub use notify::{ChangeNotifier, ChangeScope, RecordingListener, Subscription};
pub use provisioning::{CreateEmployeeRequest, CreateEmployeeResponse};
pub use query::{Columns, Filter, OrderBy, QuerySpec};
pub use record::{
    from_record, generate_id, record_from_value, records_from_value, to_record, Record,
    CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD,
};
pub use response::{ErrorShape, Response};
pub use store::{DocumentStore, StoreOptions};

// Re-exported so callers can build stores without naming the slot crate.
pub use slot_storage::{FileSlotStorage, MemorySlotStorage, SlotStorage, StorageKeys};
