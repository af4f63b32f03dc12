//! Typed views of the records the application cares about.
//!
//! The store itself only deals in [`Record`]s; these types are for callers
//! that prefer named fields. Convert with [`to_record`](crate::to_record) and
//! [`from_record`](crate::from_record).

use crate::{Record, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Fields this type does not name, e.g. a joined `role`.
    #[serde(flatten)]
    pub extra: Record,
}

/// Access level label stored in `user_roles`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Employee,
    Manager,
    Admin,
    Hr,
}

impl Role {
    pub const ALL: [Role; 4] = [Self::Employee, Self::Manager, Self::Admin, Self::Hr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Manager => "manager",
            Self::Admin => "admin",
            Self::Hr => "hr",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|r| r.as_str() == s).ok_or_else(|| {
            let valid: Vec<&str> = Self::ALL.iter().map(Role::as_str).collect();
            StoreError::malformed(format!(
                "Invalid role: {}. Must be one of: {}",
                s,
                valid.join(", ")
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRoleAssignment {
    pub user_id: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Ratings from 1 to 5 per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub productivity: u8,
    pub quality: u8,
    pub teamwork: u8,
    pub communication: u8,
}

impl CategoryScores {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    fn all(&self) -> [(&'static str, u8); 4] {
        [
            ("productivity", self.productivity),
            ("quality", self.quality),
            ("teamwork", self.teamwork),
            ("communication", self.communication),
        ]
    }

    /// Name of the first category outside `MIN..=MAX`.
    pub fn first_out_of_range(&self) -> Option<&'static str> {
        self.all()
            .into_iter()
            .find(|(_, v)| !(Self::MIN..=Self::MAX).contains(v))
            .map(|(name, _)| name)
    }

    /// Mean rating rounded to one decimal.
    pub fn overall(&self) -> f64 {
        let sum: u32 = self.all().iter().map(|(_, v)| u32::from(*v)).sum();
        let mean = f64::from(sum) / 4.0;
        (mean * 10.0).round() / 10.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: String,
    pub employee_id: String,
    pub evaluator_id: String,
    pub score: f64,
    #[serde(default)]
    pub comments: Option<String>,
    pub categories: CategoryScores,
    pub evaluation_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_record, to_record};
    use serde_json::json;

    #[test]
    fn role_labels_roundtrip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
            assert_eq!(serde_json::to_value(role).unwrap(), json!(role.as_str()));
        }
        let err = "owner".parse::<Role>().unwrap_err();
        assert!(err.to_string().contains("employee, manager, admin, hr"));
    }

    #[test]
    fn profile_keeps_unknown_fields() {
        let record = json!({
            "id": "p1",
            "email": "a@x.com",
            "full_name": "A",
            "role": "admin"
        })
        .as_object()
        .cloned()
        .unwrap();
        let profile: Profile = from_record(record).unwrap();
        assert_eq!(profile.id.as_deref(), Some("p1"));
        assert!(profile.department.is_none());
        assert_eq!(profile.extra["role"], "admin");

        let back = to_record(&profile).unwrap();
        assert_eq!(back["role"], "admin");
        assert!(!back.contains_key("created_at"));
    }

    #[test]
    fn overall_score_is_rounded_mean() {
        let scores = CategoryScores {
            productivity: 4,
            quality: 5,
            teamwork: 3,
            communication: 4,
        };
        assert_eq!(scores.overall(), 4.0);

        let scores = CategoryScores {
            productivity: 5,
            quality: 4,
            teamwork: 4,
            communication: 4,
        };
        assert_eq!(scores.overall(), 4.3);
        assert_eq!(scores.first_out_of_range(), None);

        let bad = CategoryScores { teamwork: 0, ..scores };
        assert_eq!(bad.first_out_of_range(), Some("teamwork"));
    }
}
