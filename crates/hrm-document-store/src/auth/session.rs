use super::credentials::{hash_password, verify_password, CredentialVault};
use crate::models::Role;
use crate::notify::ChangeScope;
use crate::record::{generate_id, CREATED_AT_FIELD, ID_FIELD};
use crate::{Collection, DocumentStore, Record, StoreError, StoreResult};
use hrm_config_and_utils::DuplicateEmailPolicy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slot_storage::StorageKeys;
use tracing::{debug, info, warn};

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=";
const ROLE_FIELD: &str = "role";

/// Optional profile fields supplied at sign-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpOptions {
    pub full_name: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
}

/// Persisted session: the joined user record. Never holds the password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: Record,
    pub established_at: String,
}

impl Session {
    pub fn user_id(&self) -> Option<&str> {
        self.user.get(ID_FIELD).and_then(Value::as_str)
    }

    pub fn email(&self) -> Option<&str> {
        self.user.get("email").and_then(Value::as_str)
    }

    /// Unknown or missing labels read as `employee`.
    pub fn role(&self) -> Role {
        self.user
            .get(ROLE_FIELD)
            .and_then(Value::as_str)
            .and_then(|r| r.parse().ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: Record,
    pub session: Session,
}

/// Auth operations over a store. Obtained from [`DocumentStore::auth`].
#[derive(Debug, Clone, Copy)]
pub struct Auth<'a> {
    store: &'a DocumentStore,
}

impl DocumentStore {
    pub fn auth(&self) -> Auth<'_> {
        Auth { store: self }
    }
}

impl Auth<'_> {
    /// Create a profile with role `employee` and sign it in.
    pub fn sign_up(
        &self,
        email: &str,
        password: &str,
        options: SignUpOptions,
    ) -> StoreResult<AuthResponse> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(StoreError::malformed("a valid email is required"));
        }
        if password.is_empty() {
            return Err(StoreError::malformed("a password is required"));
        }
        let password_hash = hash_password(password)?;

        let store = self.store;
        let response = {
            let _guard = store.lock();
            let mut document = store.load_unlocked()?;

            if store.options().duplicate_email_policy == DuplicateEmailPolicy::Reject
                && document.profile_by_email(email).is_some()
            {
                return Err(StoreError::DuplicateEmail(email.to_string()));
            }

            let clock = store.clock();
            let user_id = generate_id("user", clock);
            let now = clock.now_rfc3339();
            let local_part = email.split('@').next().unwrap_or(email);

            let mut profile = Record::new();
            profile.insert(ID_FIELD.into(), user_id.clone().into());
            profile.insert("email".into(), email.into());
            profile.insert(
                "full_name".into(),
                non_empty(options.full_name)
                    .unwrap_or_else(|| local_part.to_string())
                    .into(),
            );
            profile.insert("department".into(), non_empty(options.department).into());
            profile.insert("position".into(), non_empty(options.position).into());
            profile.insert(
                "avatar_url".into(),
                format!("{}{}", AVATAR_BASE_URL, email).into(),
            );
            profile.insert("status".into(), "active".into());
            profile.insert(CREATED_AT_FIELD.into(), now.clone().into());

            let mut role = Record::new();
            role.insert(ID_FIELD.into(), generate_id(Collection::UserRoles.as_str(), clock).into());
            role.insert("user_id".into(), user_id.clone().into());
            role.insert(ROLE_FIELD.into(), Role::Employee.as_str().into());
            role.insert(CREATED_AT_FIELD.into(), now.into());

            document.records_mut(Collection::Profiles).push(profile.clone());
            document.records_mut(Collection::UserRoles).push(role);

            let vault = CredentialVault::new(store.storage());
            vault.set(&user_id, password_hash)?;
            if let Err(err) = store.save_unlocked(&document) {
                if let Err(cleanup) = vault.remove(&user_id) {
                    warn!(error = %cleanup, "Failed to discard credential after sign-up failure");
                }
                return Err(err);
            }

            let mut user = profile;
            user.insert(ROLE_FIELD.into(), Role::Employee.as_str().into());
            info!(user_id = %user_id, "Signed up");
            self.write_session(user.clone())
                .map(|session| AuthResponse { user, session })
        };

        // The profile and role are committed at this point even when the
        // session slot could not be written.
        store.notify(ChangeScope::Any);
        if let Err(err) = &response {
            warn!(error = %err, "Signed up but failed to write the session");
        }
        response
    }

    /// Sign in an existing profile by email.
    ///
    /// Profiles without a stored credential (written by a plain insert) are
    /// accepted with any password unless passwordless profiles are disabled.
    pub fn sign_in_with_password(&self, email: &str, password: &str) -> StoreResult<AuthResponse> {
        let store = self.store;
        let response = {
            let _guard = store.lock();
            let document = store.load_unlocked()?;

            let Some(profile) = document.profile_by_email(email) else {
                debug!("Sign-in for unknown email");
                return Err(StoreError::InvalidCredentials);
            };
            let user_id = profile
                .get(ID_FIELD)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            match CredentialVault::new(store.storage()).get(&user_id)? {
                Some(hash) if verify_password(password, &hash) => {}
                None if store.options().allow_passwordless_profiles => {
                    debug!(user_id = %user_id, "Profile has no credential, accepting");
                }
                _ => return Err(StoreError::InvalidCredentials),
            }

            let role = document
                .records(Collection::UserRoles)
                .iter()
                .find(|r| r.get("user_id").and_then(Value::as_str) == Some(user_id.as_str()))
                .and_then(|r| r.get(ROLE_FIELD).cloned())
                .unwrap_or_else(|| Role::Employee.as_str().into());

            let mut user = profile.clone();
            user.insert(ROLE_FIELD.into(), role);
            let session = self.write_session(user.clone())?;
            info!(user_id = %user_id, "Signed in");
            AuthResponse { user, session }
        };

        store.notify(ChangeScope::Any);
        Ok(response)
    }

    /// Clear the session slot. Never fails; storage errors are logged.
    pub fn sign_out(&self) {
        {
            let _guard = self.store.lock();
            match self.store.storage().delete(StorageKeys::CURRENT_USER) {
                Ok(existed) => debug!(existed, "Signed out"),
                Err(err) => warn!(error = %err, "Failed to clear session slot"),
            }
        }
        self.store.notify(ChangeScope::Any);
    }

    /// The current session, if any. An unreadable slot yields `None`.
    pub fn get_session(&self) -> Option<Session> {
        let _guard = self.store.lock();
        let text = match self.store.storage().get(StorageKeys::CURRENT_USER) {
            Ok(text) => text?,
            Err(err) => {
                warn!(error = %err, "Failed to read session slot");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(error = %err, discarded_len = text.len(), "Session slot is unreadable");
                None
            }
        }
    }

    /// Caller must hold the operation lock.
    fn write_session(&self, user: Record) -> StoreResult<Session> {
        let session = Session {
            user,
            established_at: self.store.clock().now_rfc3339(),
        };
        let text = serde_json::to_string(&session)?;
        self.store.storage().set(StorageKeys::CURRENT_USER, &text)?;
        Ok(session)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
