//! Logging initialization.
//!
//! Thin wrapper over the `observability` package: structured JSONL goes to
//! `<data-dir>/logs/hrm.jsonl`, the level comes from `RUST_LOG` or the
//! configured default.

use crate::Paths;

/// Initialize the logging system for an HRM binary.
///
/// ```ignore
/// init_logging(&paths, "info", false);
/// tracing::info!("store opened");
/// ```
pub fn init_logging(paths: &Paths, level: &str, also_stderr: bool) {
    observability::init_with_config(observability::LogConfig {
        service_name: "hrm".into(),
        default_level: level.into(),
        log_path: Some(paths.log_file()),
        also_stderr,
    });
}
