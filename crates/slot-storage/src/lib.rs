//! Key-value slot storage for the HRM document store.
//!
//! A slot is a named string value that is always read and replaced whole.
//! Two implementations are provided:
//! - **File**: one file per slot inside a directory, written atomically
//! - **Memory**: a process-local map, for tests and scratch stores

mod file;
mod keys;
mod memory;
mod traits;

pub use file::FileSlotStorage;
pub use keys::StorageKeys;
pub use memory::MemorySlotStorage;
pub use traits::SlotStorage;

use std::path::PathBuf;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Key contains characters that cannot name a slot
    #[error("Invalid slot key: {0}")]
    InvalidKey(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Create the default file-backed storage rooted at `dir`.
pub fn create_storage(dir: impl Into<PathBuf>) -> StorageResult<Box<dyn SlotStorage>> {
    let storage = FileSlotStorage::new(dir)?;
    Ok(Box::new(storage))
}

/// Slot keys are restricted to `[A-Za-z0-9_.-]` and may not start with a dot.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
