//! Configuration, paths, and logging bootstrap for the HRM store.

mod config;
mod error;
mod logging;
mod paths;
mod policy;

pub use config::{Config, DEFAULT_LOG_LEVEL, LOG_LEVEL_ENV};
pub use error::{CoreError, CoreResult};
pub use logging::init_logging;
pub use paths::{Paths, DATA_DIR_ENV};
pub use policy::{CorruptDocumentPolicy, DuplicateEmailPolicy, DuplicateKeyPolicy};
