//! The named collections of the document and their field shapes.

use crate::{Record, StoreError, StoreResult};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A named, insertion-ordered sequence of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Profiles,
    Messages,
    Tasks,
    Meetings,
    Attendance,
    Evaluations,
    UserRoles,
}

/// Expected JSON type of a well-known field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    OptionalText,
    Number,
    OptionalNumber,
    Flag,
    Object,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Text => value.is_string(),
            Self::OptionalText => value.is_string() || value.is_null(),
            Self::Number => value.is_number(),
            Self::OptionalNumber => value.is_number() || value.is_null(),
            Self::Flag => value.is_boolean(),
            Self::Object => value.is_object(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Text => "a string",
            Self::OptionalText => "a string or null",
            Self::Number => "a number",
            Self::OptionalNumber => "a number or null",
            Self::Flag => "a boolean",
            Self::Object => "an object",
        }
    }
}

use FieldKind::*;

// id/created_at may be null or empty: the store fills them in.
const COMMON_FIELDS: &[(&str, FieldKind)] = &[
    ("id", OptionalText),
    ("created_at", OptionalText),
    ("updated_at", OptionalText),
];

const PROFILE_FIELDS: &[(&str, FieldKind)] = &[
    ("email", Text),
    ("full_name", Text),
    ("department", OptionalText),
    ("position", OptionalText),
    ("avatar_url", OptionalText),
    ("status", OptionalText),
    ("join_date", OptionalText),
    ("performance_score", OptionalNumber),
];

const MESSAGE_FIELDS: &[(&str, FieldKind)] = &[
    ("from_user", Text),
    ("to_user", OptionalText),
    ("subject", Text),
    ("content", Text),
    ("is_broadcast", Flag),
    ("read", Flag),
];

const TASK_FIELDS: &[(&str, FieldKind)] = &[
    ("title", Text),
    ("description", OptionalText),
    ("assigned_to", Text),
    ("assigned_by", Text),
    ("status", Text),
    ("priority", Text),
    ("due_date", OptionalText),
];

const MEETING_FIELDS: &[(&str, FieldKind)] = &[
    ("title", Text),
    ("description", OptionalText),
    ("scheduled_by", Text),
    ("date", Text),
    ("time", Text),
    ("link", OptionalText),
    ("status", Text),
];

const ATTENDANCE_FIELDS: &[(&str, FieldKind)] = &[
    ("employee_id", Text),
    ("date", Text),
    ("check_in", OptionalText),
    ("check_out", OptionalText),
    ("status", Text),
];

const EVALUATION_FIELDS: &[(&str, FieldKind)] = &[
    ("employee_id", Text),
    ("evaluator_id", Text),
    ("score", Number),
    ("comments", OptionalText),
    ("categories", Object),
    ("evaluation_date", Text),
    ("satisfaction_score", Number),
    ("meetings_held", Number),
    ("training_applied", Number),
    ("outcome_summary", OptionalText),
];

const USER_ROLE_FIELDS: &[(&str, FieldKind)] = &[("user_id", Text), ("role", Text)];

impl Collection {
    /// Every collection, in document order.
    pub const ALL: [Collection; 7] = [
        Self::Profiles,
        Self::Messages,
        Self::Tasks,
        Self::Meetings,
        Self::Attendance,
        Self::Evaluations,
        Self::UserRoles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profiles => "profiles",
            Self::Messages => "messages",
            Self::Tasks => "tasks",
            Self::Meetings => "meetings",
            Self::Attendance => "attendance",
            Self::Evaluations => "evaluations",
            Self::UserRoles => "user_roles",
        }
    }

    fn fields(&self) -> &'static [(&'static str, FieldKind)] {
        match self {
            Self::Profiles => PROFILE_FIELDS,
            Self::Messages => MESSAGE_FIELDS,
            Self::Tasks => TASK_FIELDS,
            Self::Meetings => MEETING_FIELDS,
            Self::Attendance => ATTENDANCE_FIELDS,
            Self::Evaluations => EVALUATION_FIELDS,
            Self::UserRoles => USER_ROLE_FIELDS,
        }
    }

    /// Check the well-known fields present in `record`.
    ///
    /// Absent fields and unknown extra fields are accepted.
    pub fn validate(&self, record: &Record) -> StoreResult<()> {
        for (field, kind) in COMMON_FIELDS.iter().chain(self.fields()) {
            if let Some(value) = record.get(*field) {
                if !kind.accepts(value) {
                    return Err(StoreError::malformed(format!(
                        "{}.{} must be {}",
                        self.as_str(),
                        field,
                        kind.describe()
                    )));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| StoreError::malformed(format!("unknown collection '{}'", s)))
    }
}
