//! Session-based authentication layered on `profiles` and `user_roles`.
//!
//! The signed-in user lives in the `current_user` slot; there is no expiry.
//! Password hashes live in the `credentials` slot, outside the exported
//! document.

mod credentials;
mod session;

pub(crate) use credentials::{hash_password, CredentialVault};
pub use session::{Auth, AuthResponse, Session, SignUpOptions};
