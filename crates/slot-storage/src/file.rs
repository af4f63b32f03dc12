//! File-backed slot storage.
//!
//! Each slot lives in `<dir>/<key>.json`. Writes go to a sibling temp file
//! which is then renamed over the slot, so a crash mid-write leaves the
//! previous value intact.

use crate::{validate_key, SlotStorage, StorageError, StorageResult};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const SLOT_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = ".tmp";

/// Slot storage keeping one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileSlotStorage {
    dir: PathBuf,
}

impl FileSlotStorage {
    /// Open (creating if needed) the slot directory.
    pub fn new(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the slot files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, SLOT_EXTENSION))
    }
}

impl SlotStorage for FileSlotStorage {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;
        let path = self.slot_path(key);
        let tmp = self.dir.join(format!("{}.{}{}", key, SLOT_EXTENSION, TEMP_SUFFIX));

        debug!(key = %key, bytes = value.len(), "Writing slot");

        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        match fs::read(self.slot_path(key)) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| StorageError::Encoding(format!("slot {} is not UTF-8: {}", key, e))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        validate_key(key)?;
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => {
                debug!(key = %key, "Deleted slot");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
