//! Whole-store backup and restore.

use crate::notify::ChangeScope;
use crate::{Document, DocumentStore, StoreError, StoreResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

impl DocumentStore {
    /// The whole document as pretty-printed JSON.
    pub fn export_to_json(&self) -> StoreResult<String> {
        self.load()?.to_json_pretty()
    }

    /// Write `hrm-backup-<timestamp>.json` into `dir` and return its path.
    pub fn export_to_file(&self, dir: &Path) -> StoreResult<PathBuf> {
        let text = self.export_to_json()?;
        fs::create_dir_all(dir)?;
        let path = dir.join(backup_file_name(&self.clock().now_rfc3339()));
        fs::write(&path, text.as_bytes())?;
        info!(path = %path.display(), bytes = text.len(), "Exported document");
        Ok(path)
    }

    /// Replace the whole store with a serialized document.
    ///
    /// On failure the stored document is left as it was.
    pub fn import_from_json(&self, text: &str) -> StoreResult<()> {
        let imported = Document::parse(text)?;
        let records = imported.record_count();
        {
            let _guard = self.lock();
            self.save_unlocked(&imported)?;
        }
        self.notify(ChangeScope::Any);
        info!(records, "Imported document");
        Ok(())
    }

    /// Import a backup file. Unreadable files are `Io`; contents that are
    /// not UTF-8 JSON are `MalformedInput`.
    pub fn import_from_file(&self, path: &Path) -> StoreResult<()> {
        debug!(path = %path.display(), "Reading import file");
        let bytes = fs::read(path)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| StoreError::malformed(format!("backup is not UTF-8: {}", e)))?;
        self.import_from_json(&text)
    }
}

/// Colons are not portable in file names.
fn backup_file_name(timestamp: &str) -> String {
    format!("hrm-backup-{}.json", timestamp.replace(':', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_name_has_no_colons() {
        assert_eq!(
            backup_file_name("2024-03-01T09:30:00.000Z"),
            "hrm-backup-2024-03-01T09-30-00.000Z.json"
        );
    }
}
