//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infra layer.

use crate::domain::entity::user_record::UserRecord;
use crate::domain::value_object::{user_name::UserName, user_password::UserPassword};
use crate::error::AuthResult;

/// Credential store: user name to password hash
#[trait_variant::make(CredentialStore: Send)]
pub trait LocalCredentialStore {
    /// Persist a new user.
    ///
    /// The uniqueness check and the insert are one atomic step: of two
    /// concurrent calls with the same user name exactly one succeeds, the
    /// other gets `AuthError::DuplicateUser`.
    async fn register(
        &self,
        user_name: &UserName,
        password_hash: &UserPassword,
    ) -> AuthResult<UserRecord>;

    /// Find user by user name
    async fn find_by_username(&self, user_name: &UserName) -> AuthResult<Option<UserRecord>>;
}
