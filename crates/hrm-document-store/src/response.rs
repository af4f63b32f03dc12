//! `{data, error}` envelope for callers that want the hosted client's shape.

use crate::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorShape {
    pub code: String,
    pub message: String,
}

impl From<&StoreError> for ErrorShape {
    fn from(err: &StoreError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Exactly one of `data` and `error` is meaningful. A successful call whose
/// data is "nothing" (delete, sign-out, no session) has both unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T> {
    pub data: Option<T>,
    pub error: Option<ErrorShape>,
}

impl<T> Response<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn err(err: &StoreError) -> Self {
        Self {
            data: None,
            error: Some(err.into()),
        }
    }

    /// For terminals whose "nothing found" is `None` rather than an error.
    pub fn from_optional(result: StoreResult<Option<T>>) -> Self {
        match result {
            Ok(data) => Self { data, error: None },
            Err(err) => Self::err(&err),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl<T> From<StoreResult<T>> for Response<T> {
    fn from(result: StoreResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::err(&err),
        }
    }
}
