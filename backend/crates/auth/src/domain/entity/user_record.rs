//! User Record Entity
//!
//! The credential store's unit of persistence: identity plus password hash.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{UserId, user_name::UserName, user_password::UserPassword};

/// Registered user with its credential
///
/// The user name is immutable once registered.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Unique login name
    pub user_name: UserName,
    /// Argon2id PHC string (salt embedded)
    pub password_hash: UserPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Create a new record for registration
    pub fn new(user_name: UserName, password_hash: UserPassword) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            user_name,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}
