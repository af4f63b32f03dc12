//! Storage key constants.

/// Slot keys used by the document store
pub struct StorageKeys;

impl StorageKeys {
    /// The whole document (JSON object of collections)
    pub const DATABASE: &'static str = "hrm_database";

    /// Session of the currently signed-in user (JSON)
    pub const CURRENT_USER: &'static str = "current_user";

    /// Password hashes keyed by profile id (JSON object)
    pub const CREDENTIALS: &'static str = "credentials";

    /// All keys the store owns, in a stable order.
    pub const ALL: [&'static str; 3] = [Self::DATABASE, Self::CURRENT_USER, Self::CREDENTIALS];
}
