//! Behaviour switches for checks the store does not enforce by default.

use serde::{Deserialize, Serialize};

/// What sign-up does when a profile with the same email already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateEmailPolicy {
    /// Fail with a duplicate-email error.
    #[default]
    Reject,
    /// Create a second profile with the same email.
    Allow,
}

/// Whether insert/upsert check for colliding keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// No uniqueness checks; the first matching record wins.
    #[default]
    Allow,
    /// Reject inserts with a taken id and ambiguous upserts.
    Reject,
}

/// How a persisted document that fails to parse is handled on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptDocumentPolicy {
    /// Log a warning and start over with an empty document.
    #[default]
    Reinitialize,
    /// Fail the operation, leaving the slot untouched.
    Fail,
}
