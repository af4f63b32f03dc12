//! # Observability
//!
//! Logging bootstrap for the HRM store binaries.
//!
//! Library crates only use `tracing` macros. A binary calls
//! [`init_with_config`] once at startup; from then on every event is written
//! as one JSON object per line to the configured log file, and optionally
//! mirrored to stderr in compact form.
//!
//! ```rust,ignore
//! fn main() {
//!     observability::init_with_config(observability::LogConfig {
//!         service_name: "hrm".into(),
//!         default_level: "debug".into(),
//!         log_path: Some("/tmp/hrm/logs/hrm.jsonl".into()),
//!         also_stderr: true,
//!     });
//!     tracing::info!("ready");
//! }
//! ```

mod file_sink;
mod json_layer;

use std::path::PathBuf;

pub use file_sink::LogFileWriter;
pub use json_layer::LogEntry;

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service, included in every log line.
    pub service_name: String,

    /// Default log level filter (e.g., "debug", "info", "warn").
    /// Can be overridden by `RUST_LOG` environment variable.
    pub default_level: String,

    /// JSONL log file. When `None` only stderr output is produced.
    pub log_path: Option<PathBuf>,

    /// Also emit logs to stderr for immediate feedback.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: false,
        }
    }
}

/// Error raised when the subscriber cannot be installed.
#[derive(Debug)]
pub enum InitError {
    /// The log file could not be opened.
    LogFile(PathBuf, std::io::Error),
    /// A global subscriber was already installed.
    AlreadyInitialized,
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LogFile(path, e) => write!(f, "failed to open log file {}: {}", path.display(), e),
            Self::AlreadyInitialized => write!(f, "a global tracing subscriber is already set"),
        }
    }
}

impl std::error::Error for InitError {}

/// Initialize logging with defaults for `service_name` (stderr only).
pub fn init(service_name: &str) {
    init_with_config(LogConfig {
        service_name: service_name.into(),
        also_stderr: true,
        ..Default::default()
    });
}

/// Initialize logging, reporting (but not propagating) setup failures.
///
/// Logging must never take the process down, so a failed init is printed to
/// stderr and the process continues without a subscriber.
pub fn init_with_config(config: LogConfig) {
    if let Err(e) = try_init_with_config(config) {
        eprintln!("observability: {}", e);
    }
}

/// Initialize logging, returning an error if the subscriber cannot be set.
pub fn try_init_with_config(config: LogConfig) -> Result<(), InitError> {
    file_sink::install_subscriber(&config)
}

/// Re-export tracing macros for convenience.
pub use tracing::{debug, error, info, instrument, trace, warn};

/// Re-export Level for advanced filtering.
pub use tracing::Level;
