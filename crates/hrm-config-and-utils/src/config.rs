//! Configuration management for the store and CLI.

use crate::{
    CoreError, CoreResult, CorruptDocumentPolicy, DuplicateEmailPolicy, DuplicateKeyPolicy, Paths,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the configured log level.
pub const LOG_LEVEL_ENV: &str = "HRM_LOG_LEVEL";

const VALID_LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "warning", "error"];

/// Store configuration, persisted as `config.json` in the data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Mirror log lines to stderr.
    #[serde(default)]
    pub log_to_stderr: bool,
    /// Sign-up behaviour for an email that already has a profile.
    #[serde(default)]
    pub duplicate_email_policy: DuplicateEmailPolicy,
    /// Uniqueness checks for insert ids and upsert conflict keys.
    #[serde(default)]
    pub duplicate_key_policy: DuplicateKeyPolicy,
    /// Handling of a persisted document that fails to parse.
    #[serde(default)]
    pub corrupt_document_policy: CorruptDocumentPolicy,
    /// Let profiles without a registered password sign in.
    #[serde(default = "default_true")]
    pub allow_passwordless_profiles: bool,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_to_stderr: false,
            duplicate_email_policy: DuplicateEmailPolicy::default(),
            duplicate_key_policy: DuplicateKeyPolicy::default(),
            corrupt_document_policy: CorruptDocumentPolicy::default(),
            allow_passwordless_profiles: true,
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from the data directory, falling back to defaults.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            debug!(path = %config_path.display(), "Loading config file");
            Self::load_from_file(&config_path)?
        } else {
            debug!("No config file, using defaults");
            Self::default()
        };

        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the data directory.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    /// Reject values that would otherwise be silently ignored.
    pub fn validate(&self) -> CoreResult<()> {
        let level = self.log_level.to_ascii_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(CoreError::Config(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }
        Ok(())
    }

    /// Only the log level can be overridden at runtime.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var(LOG_LEVEL_ENV) {
            if !log_level.trim().is_empty() {
                self.log_level = log_level.trim().to_string();
            }
        }
    }
}
