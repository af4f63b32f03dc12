//! Fluent query builder over one collection.
//!
//! ```ignore
//! let admins = store
//!     .from(Collection::UserRoles)
//!     .select("*")
//!     .eq("role", "admin")
//!     .order("created_at", false)
//!     .limit(10)
//!     .execute()?;
//! ```

use crate::notify::ChangeScope;
use crate::query::{Columns, Filter, OrderBy, QuerySpec};
use crate::record::{
    from_record, merge_into, record_from_value, records_from_value, stamp_new, ID_FIELD,
};
use crate::{Collection, DocumentStore, Record, StoreError, StoreResult};
use hrm_config_and_utils::DuplicateKeyPolicy;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Entry point returned by [`DocumentStore::from`].
#[derive(Debug, Clone, Copy)]
pub struct CollectionRef<'a> {
    store: &'a DocumentStore,
    collection: Collection,
}

/// Options for [`CollectionRef::upsert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOptions {
    /// Field deciding update vs insert. Defaults to `id`.
    pub on_conflict: String,
}

impl Default for UpsertOptions {
    fn default() -> Self {
        Self {
            on_conflict: ID_FIELD.to_string(),
        }
    }
}

impl UpsertOptions {
    pub fn on_conflict(column: impl Into<String>) -> Self {
        Self {
            on_conflict: column.into(),
        }
    }
}

impl<'a> CollectionRef<'a> {
    pub(crate) fn new(store: &'a DocumentStore, collection: Collection) -> Self {
        Self { store, collection }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Start a read. `columns` is `*` or a comma-separated field list.
    pub fn select(self, columns: &str) -> SelectBuilder<'a> {
        SelectBuilder {
            target: self,
            spec: QuerySpec {
                columns: Columns::parse(columns),
                ..QuerySpec::default()
            },
        }
    }

    /// Append one record or an array of records.
    ///
    /// Missing ids and `created_at` stamps are generated. Returns the stored
    /// records in input order.
    pub fn insert(self, records: Value) -> StoreResult<Vec<Record>> {
        let mut records = records_from_value(records)?;
        for record in &records {
            self.collection.validate(record)?;
        }

        let collection = self.collection;
        let store = self.store;
        let inserted = store.mutate(ChangeScope::Collection(collection), |doc| {
            for record in &mut records {
                stamp_new(record, collection.as_str(), store.clock());
            }
            if store.options().duplicate_key_policy == DuplicateKeyPolicy::Reject {
                let mut taken: HashSet<String> = doc
                    .records(collection)
                    .iter()
                    .filter_map(|r| r.get(ID_FIELD))
                    .map(Value::to_string)
                    .collect();
                for record in &records {
                    if let Some(id) = record.get(ID_FIELD) {
                        if !taken.insert(id.to_string()) {
                            return Err(duplicate_key(collection, ID_FIELD, Some(id)));
                        }
                    }
                }
            }
            doc.records_mut(collection).extend(records.iter().cloned());
            Ok(records)
        })?;

        debug!(collection = %collection, count = inserted.len(), "Inserted records");
        Ok(inserted)
    }

    /// Shallow-merge `patch` into matching records. Finish with `.eq(..)`.
    pub fn update(self, patch: Value) -> UpdateBuilder<'a> {
        UpdateBuilder {
            target: self,
            patch,
        }
    }

    /// Remove matching records. Finish with `.eq(..)`.
    pub fn delete(self) -> DeleteBuilder<'a> {
        DeleteBuilder { target: self }
    }

    /// Merge into the first record whose `on_conflict` field equals the
    /// incoming one, or insert when there is none.
    ///
    /// A conflict field missing from `record` matches the first stored record
    /// that lacks it as well; a missing field never matches `null`.
    pub fn upsert(self, record: Value, options: UpsertOptions) -> StoreResult<Record> {
        let record = record_from_value(record)?;
        self.collection.validate(&record)?;

        let collection = self.collection;
        let store = self.store;
        let field = options.on_conflict;
        let reject = store.options().duplicate_key_policy == DuplicateKeyPolicy::Reject;
        let key = record.get(&field).cloned();

        if reject && key.is_none() {
            return Err(duplicate_key(collection, &field, None));
        }

        let (stored, merged) = store.mutate(ChangeScope::Collection(collection), |doc| {
            let records = doc.records_mut(collection);
            let mut matches = records
                .iter()
                .enumerate()
                .filter(|(_, r)| r.get(&field) == key.as_ref())
                .map(|(i, _)| i);
            let first = matches.next();
            if reject && matches.next().is_some() {
                return Err(duplicate_key(collection, &field, key.as_ref()));
            }

            if let Some(index) = first {
                let target = &mut records[index];
                merge_into(target, &record, store.clock());
                return Ok((target.clone(), true));
            }

            let mut fresh = record;
            stamp_new(&mut fresh, collection.as_str(), store.clock());
            if reject && field != ID_FIELD {
                if let Some(id) = fresh.get(ID_FIELD) {
                    if records.iter().any(|r| r.get(ID_FIELD) == Some(id)) {
                        return Err(duplicate_key(collection, ID_FIELD, Some(id)));
                    }
                }
            }
            records.push(fresh.clone());
            Ok((fresh, false))
        })?;

        debug!(
            collection = %collection,
            on_conflict = %field,
            merged,
            "Upserted record"
        );
        Ok(stored)
    }
}

fn duplicate_key(collection: Collection, field: &str, value: Option<&Value>) -> StoreError {
    let value = match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "<absent>".to_string(),
    };
    StoreError::DuplicateKey {
        collection: collection.as_str().to_string(),
        field: field.to_string(),
        value,
    }
}

/// A read in progress. Nothing is evaluated until a terminal call.
#[derive(Debug, Clone)]
pub struct SelectBuilder<'a> {
    target: CollectionRef<'a>,
    spec: QuerySpec,
}

impl<'a> SelectBuilder<'a> {
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.spec.filters.push(Filter::eq(column, value));
        self
    }

    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.spec.order = Some(OrderBy {
            column: column.into(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.spec.limit = Some(n);
        self
    }

    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    pub fn execute(self) -> StoreResult<Vec<Record>> {
        let collection = self.target.collection;
        let spec = self.spec;
        let rows = self
            .target
            .store
            .read(|doc| spec.evaluate(doc.records(collection)))?;
        debug!(collection = %collection, rows = rows.len(), "Selected records");
        Ok(rows)
    }

    /// First row of the current ordering, or `None`.
    pub fn single(self) -> StoreResult<Option<Record>> {
        Ok(self.limit(1).execute()?.into_iter().next())
    }

    /// Execute and decode each row into `T`.
    pub fn execute_as<T: DeserializeOwned>(self) -> StoreResult<Vec<T>> {
        self.execute()?.into_iter().map(from_record).collect()
    }
}

#[derive(Debug, Clone)]
pub struct UpdateBuilder<'a> {
    target: CollectionRef<'a>,
    patch: Value,
}

impl UpdateBuilder<'_> {
    /// Apply the patch to every record whose `column` equals `value`.
    ///
    /// Returns the updated records that still match afterwards, so a patch
    /// rewriting `column` itself yields an empty result.
    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> StoreResult<Vec<Record>> {
        let patch = record_from_value(self.patch)?;
        let collection = self.target.collection;
        collection.validate(&patch)?;

        let store = self.target.store;
        let filter = Filter::eq(column, value);
        let mut patched = 0usize;
        let updated = store.mutate(ChangeScope::Collection(collection), |doc| {
            let mut updated = Vec::new();
            for record in doc.records_mut(collection).iter_mut() {
                if filter.matches(record) {
                    merge_into(record, &patch, store.clock());
                    patched += 1;
                    if filter.matches(record) {
                        updated.push(record.clone());
                    }
                }
            }
            Ok(updated)
        })?;

        debug!(
            collection = %collection,
            column = %filter.column,
            patched,
            count = updated.len(),
            "Updated records"
        );
        Ok(updated)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteBuilder<'a> {
    target: CollectionRef<'a>,
}

impl DeleteBuilder<'_> {
    /// Remove every record whose `column` equals `value`.
    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> StoreResult<()> {
        let collection = self.target.collection;
        let filter = Filter::eq(column, value);
        let removed = self
            .target
            .store
            .mutate(ChangeScope::Collection(collection), |doc| {
                let records = doc.records_mut(collection);
                let before = records.len();
                records.retain(|r| !filter.matches(r));
                Ok(before - records.len())
            })?;
        debug!(collection = %collection, column = %filter.column, removed, "Deleted records");
        Ok(())
    }
}
