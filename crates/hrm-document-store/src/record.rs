//! Loosely typed records and the helpers that stamp and merge them.

use crate::{Clock, StoreError, StoreResult};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// One row of a collection: a JSON object with any fields.
pub type Record = Map<String, Value>;

pub const ID_FIELD: &str = "id";
pub const CREATED_AT_FIELD: &str = "created_at";
pub const UPDATED_AT_FIELD: &str = "updated_at";

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate `<prefix>_<epoch millis>_<9 random base36 chars>`.
pub fn generate_id(prefix: &str, clock: &dyn Clock) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}_{}_{}", prefix, clock.now_millis(), suffix)
}

/// Accept one object or an array of objects.
pub fn records_from_value(value: Value) -> StoreResult<Vec<Record>> {
    match value {
        Value::Object(record) => Ok(vec![record]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(record) => Ok(record),
                other => Err(StoreError::malformed(format!(
                    "item {} is {}, expected an object",
                    i,
                    json_type_name(&other)
                ))),
            })
            .collect(),
        other => Err(StoreError::malformed(format!(
            "expected an object or an array of objects, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Accept exactly one object.
pub fn record_from_value(value: Value) -> StoreResult<Record> {
    match value {
        Value::Object(record) => Ok(record),
        other => Err(StoreError::malformed(format!(
            "expected an object, got {}",
            json_type_name(&other)
        ))),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Empty strings and nulls count as "not set", like a falsy check.
fn is_unset(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Fill in `id` and `created_at` when the caller left them unset.
pub(crate) fn stamp_new(record: &mut Record, id_prefix: &str, clock: &dyn Clock) {
    if is_unset(record.get(ID_FIELD)) {
        record.insert(ID_FIELD.to_string(), Value::String(generate_id(id_prefix, clock)));
    }
    if is_unset(record.get(CREATED_AT_FIELD)) {
        record.insert(CREATED_AT_FIELD.to_string(), Value::String(clock.now_rfc3339()));
    }
}

/// Shallow-merge `patch` into `target` and stamp `updated_at`.
///
/// An existing `created_at` is kept even if the patch carries one.
pub(crate) fn merge_into(target: &mut Record, patch: &Record, clock: &dyn Clock) {
    let created_at = target.get(CREATED_AT_FIELD).cloned();
    for (key, value) in patch {
        target.insert(key.clone(), value.clone());
    }
    if let Some(created_at) = created_at {
        target.insert(CREATED_AT_FIELD.to_string(), created_at);
    }
    target.insert(UPDATED_AT_FIELD.to_string(), Value::String(clock.now_rfc3339()));
}

/// Convert a typed model into a record.
pub fn to_record<T: Serialize>(value: &T) -> StoreResult<Record> {
    record_from_value(serde_json::to_value(value)?)
}

/// Convert a record into a typed model.
pub fn from_record<T: DeserializeOwned>(record: Record) -> StoreResult<T> {
    serde_json::from_value(Value::Object(record)).map_err(|e| StoreError::malformed(e.to_string()))
}
