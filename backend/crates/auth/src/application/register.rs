//! Register Use Case
//!
//! Creates a new user account. No token is issued; the client logs in next.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::{
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub user_name: String,
    pub password: String,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    pub user_name: UserName,
}

/// Register use case
pub struct RegisterUseCase<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> RegisterUseCase<S>
where
    S: CredentialStore,
{
    pub fn new(store: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        // Validate shape before touching the store
        let user_name =
            UserName::new(&input.user_name).map_err(|e| AuthError::Validation(e.to_string()))?;
        let raw_password = RawPassword::new(input.password)?;

        // Cheap precheck so a taken name does not cost a hash
        if self.store.find_by_username(&user_name).await?.is_some() {
            return Err(AuthError::DuplicateUser);
        }

        let password_hash = UserPassword::hash(raw_password, self.config.pepper()).await?;

        // The store insert is the authoritative uniqueness check
        let record = self.store.register(&user_name, &password_hash).await?;

        tracing::info!(
            user_id = %record.user_id,
            user_name = %record.user_name,
            "User registered"
        );

        Ok(RegisterOutput {
            user_name: record.user_name,
        })
    }
}
