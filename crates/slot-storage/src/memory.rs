//! In-memory slot storage, used by tests and throwaway stores.

use crate::{validate_key, SlotStorage, StorageResult};
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Slot storage held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemorySlotStorage {
    data: Mutex<BTreeMap<String, String>>,
}

impl MemorySlotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SlotStorage for MemorySlotStorage {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.data.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.data.lock().get(key).cloned())
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        Ok(self.data.lock().remove(key).is_some())
    }
}
