//! In-Memory Credential Store
//!
//! Process-local store for tests and database-less development.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entity::user_record::UserRecord;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::{user_name::UserName, user_password::UserPassword};
use crate::error::{AuthError, AuthResult};

/// Credential store backed by a `HashMap` behind an async `RwLock`
///
/// Clones share the same map.
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    async fn register(
        &self,
        user_name: &UserName,
        password_hash: &UserPassword,
    ) -> AuthResult<UserRecord> {
        let mut users = self.users.write().await;

        match users.entry(user_name.as_str().to_string()) {
            Entry::Occupied(_) => Err(AuthError::DuplicateUser),
            Entry::Vacant(slot) => {
                let record = UserRecord::new(user_name.clone(), password_hash.clone());
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn find_by_username(&self, user_name: &UserName) -> AuthResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(user_name.as_str()).cloned())
    }
}
