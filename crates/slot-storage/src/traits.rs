//! Storage trait definitions.

use crate::StorageResult;

/// A backend holding named string slots.
///
/// Every slot is replaced as a whole: readers never observe a partially
/// written value.
pub trait SlotStorage: Send + Sync {
    /// Store a value, replacing whatever the slot held before
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Retrieve a value
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Delete a value. Returns whether the slot existed.
    fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Check if a key exists
    fn has(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
