//! Store error types.

use slot_storage::StorageError;
use thiserror::Error;

/// Store error type.
///
/// "Nothing matched" is never an error: queries return empty results.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Caller supplied something that is not a well-formed record or document
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Sign-in failed
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// A key that must be unique is already taken
    #[error("Duplicate key in {collection}: {field} = {value}")]
    DuplicateKey {
        collection: String,
        field: String,
        value: String,
    },

    /// Sign-up for an email that already has a profile
    #[error("A profile with email {0} already exists")]
    DuplicateEmail(String),

    /// The slot backend failed or holds an unreadable document
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error outside the slot backend (export files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Stable machine-readable code, used in `{data, error}` responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) => "malformed_input",
            Self::InvalidCredentials => "invalid_credentials",
            Self::DuplicateKey { .. } => "duplicate_key",
            Self::DuplicateEmail(_) => "duplicate_email",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::Json(_) => "malformed_input",
            Self::Io(_) => "storage_unavailable",
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

/// Result type alias using StoreError.
pub type StoreResult<T> = Result<T, StoreError>;
