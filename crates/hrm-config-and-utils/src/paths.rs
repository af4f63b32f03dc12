//! File system paths for the store.

use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "HRM_DATA_DIR";

const BASE_DIR_NAME: &str = ".hrm";
const LOG_FILE_NAME: &str = "hrm.jsonl";

/// Manages file system paths for the store.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory (~/.hrm unless overridden)
    base_dir: PathBuf,
}

impl Paths {
    /// Resolve the data directory: `HRM_DATA_DIR` if set, else `~/.hrm`.
    pub fn new() -> CoreResult<Self> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(Self::with_base_dir(PathBuf::from(dir)));
            }
        }

        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(BASE_DIR_NAME),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the config file path (<base>/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Directory holding the storage slots (<base>/slots).
    pub fn slots_dir(&self) -> PathBuf {
        self.base_dir.join("slots")
    }

    /// Default destination for exported backups (<base>/exports).
    pub fn exports_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Get the logs directory (<base>/logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the JSONL log file path (<base>/logs/hrm.jsonl).
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join(LOG_FILE_NAME)
    }

    /// Ensure all required directories exist.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.slots_dir())?;
        std::fs::create_dir_all(self.exports_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
