//! Admin-side employee creation against the embedded store.
//!
//! Creates the credential, the profile and the role assignment for a new
//! employee and hands back a one-time temporary password.

use crate::auth::{hash_password, CredentialVault};
use crate::builder::UpsertOptions;
use crate::models::Role;
use crate::{Collection, DocumentStore, StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

const TEMP_PASSWORD_LEN: usize = 12;
const TEMP_PASSWORD_SUFFIX: &str = "A1!";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEmployeeRequest {
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEmployeeResponse {
    pub success: bool,
    pub user_id: String,
    pub email: String,
    pub temporary_password: String,
    pub message: String,
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // A dot with something on both sides.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn temporary_password() -> String {
    let mut password: String = Uuid::new_v4()
        .to_string()
        .chars()
        .take(TEMP_PASSWORD_LEN)
        .collect();
    password.push_str(TEMP_PASSWORD_SUFFIX);
    password
}

fn blank_to_null(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl DocumentStore {
    /// Provision an employee account.
    ///
    /// Input is validated before anything is written, and an email that
    /// already belongs to a profile is refused with `DuplicateEmail`
    /// whatever the sign-up policy. If assigning the role fails, the profile
    /// and credential written before it are removed again.
    pub fn create_employee(
        &self,
        request: CreateEmployeeRequest,
    ) -> StoreResult<CreateEmployeeResponse> {
        let email = request.email.trim().to_string();
        let full_name = request.full_name.trim().to_string();
        if email.is_empty() || full_name.is_empty() {
            return Err(StoreError::malformed("Email and full name are required"));
        }
        if !is_valid_email(&email) {
            return Err(StoreError::malformed("Invalid email format"));
        }
        let role: Role = match blank_to_null(request.role) {
            Some(label) => label.parse()?,
            None => Role::Employee,
        };

        let user_id = Uuid::new_v4().to_string();
        let temporary_password = temporary_password();
        let vault = CredentialVault::new(self.storage());
        let password_hash = hash_password(&temporary_password)?;
        {
            let _guard = self.lock();
            if self.load_unlocked()?.profile_by_email(&email).is_some() {
                warn!(email = %email, "Refusing to provision a taken email");
                return Err(StoreError::DuplicateEmail(email));
            }
            vault.set(&user_id, password_hash)?;
        }

        let now = self.clock().now_rfc3339();
        let profile = json!({
            "id": user_id,
            "email": email,
            "full_name": full_name,
            "department": blank_to_null(request.department),
            "position": blank_to_null(request.position),
            "avatar_url": null,
            "status": "active",
            "created_at": now,
            "updated_at": now,
        });
        if let Err(err) = self
            .from(Collection::Profiles)
            .upsert(profile, UpsertOptions::default())
        {
            error!(error = %err, "Profile creation failed");
            self.discard_credential(&vault, &user_id);
            return Err(err);
        }

        let assignment = json!({
            "user_id": user_id,
            "role": role.as_str(),
            "created_at": now,
            "updated_at": now,
        });
        if let Err(err) = self
            .from(Collection::UserRoles)
            .upsert(assignment, UpsertOptions::on_conflict("user_id"))
        {
            error!(error = %err, "Role assignment failed");
            self.discard_credential(&vault, &user_id);
            if let Err(cleanup) = self.from(Collection::Profiles).delete().eq("id", user_id.as_str()) {
                error!(error = %cleanup, "Failed to roll back profile");
            }
            return Err(err);
        }

        info!(user_id = %user_id, role = %role, "Employee account created");
        Ok(CreateEmployeeResponse {
            success: true,
            user_id,
            email,
            temporary_password,
            message: "Employee account created successfully".to_string(),
        })
    }

    fn discard_credential(&self, vault: &CredentialVault<'_>, user_id: &str) {
        let _guard = self.lock();
        if let Err(err) = vault.remove(user_id) {
            error!(error = %err, "Failed to roll back credential");
        }
    }
}
