//! Password hashes, kept in their own slot and never exported.

use crate::{StoreError, StoreResult};
use argon2::{
    password_hash::{rand_core, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use slot_storage::{SlotStorage, StorageKeys};
use std::collections::BTreeMap;

/// Hash a password with Argon2id into a PHC string.
pub(crate) fn hash_password(password: &str) -> StoreResult<String> {
    let salt = SaltString::generate(&mut rand_core::OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StoreError::StorageUnavailable(format!("password hashing failed: {}", e)))
}

/// A malformed stored hash never verifies.
pub(crate) fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Profile id to password hash, persisted as one JSON object.
pub(crate) struct CredentialVault<'a> {
    storage: &'a dyn SlotStorage,
}

impl<'a> CredentialVault<'a> {
    pub(crate) fn new(storage: &'a dyn SlotStorage) -> Self {
        Self { storage }
    }

    fn load(&self) -> StoreResult<BTreeMap<String, String>> {
        match self.storage.get(StorageKeys::CREDENTIALS)? {
            None => Ok(BTreeMap::new()),
            Some(text) => serde_json::from_str(&text).map_err(|e| {
                StoreError::StorageUnavailable(format!("credential slot is unreadable: {}", e))
            }),
        }
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        let text = serde_json::to_string(entries)?;
        self.storage.set(StorageKeys::CREDENTIALS, &text)?;
        Ok(())
    }

    pub(crate) fn get(&self, user_id: &str) -> StoreResult<Option<String>> {
        Ok(self.load()?.remove(user_id))
    }

    pub(crate) fn set(&self, user_id: &str, password_hash: String) -> StoreResult<()> {
        let mut entries = self.load()?;
        entries.insert(user_id.to_string(), password_hash);
        self.store(&entries)
    }

    pub(crate) fn remove(&self, user_id: &str) -> StoreResult<bool> {
        let mut entries = self.load()?;
        let existed = entries.remove(user_id).is_some();
        if existed {
            self.store(&entries)?;
        }
        Ok(existed)
    }
}
