//! Login Use Case
//!
//! Verifies credentials and issues a bearer token.
//!
//! Unknown user, wrong password and a corrupt stored hash all end in the same
//! `InvalidCredentials`, and the unknown-user path still spends one hash so
//! response time does not reveal which case occurred.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token_service::TokenService;
use crate::domain::entity::token_claims::TokenClaims;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::{user_name::UserName, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub user_name: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed bearer token
    pub token: String,
    pub claims: TokenClaims,
}

/// Login use case
pub struct LoginUseCase<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<S> LoginUseCase<S>
where
    S: CredentialStore,
{
    pub fn new(store: Arc<S>, tokens: Arc<TokenService>, config: Arc<AuthConfig>) -> Self {
        Self {
            store,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // Input that could never have been registered cannot match a record
        let user_name = UserName::new(&input.user_name).map_err(|_| AuthError::InvalidCredentials)?;
        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let Some(record) = self.store.find_by_username(&user_name).await? else {
            raw_password.equalize_timing(self.config.pepper()).await;
            tracing::debug!(user_name = %user_name, "Login for unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        let matched = match record
            .password_hash
            .verify(raw_password, self.config.pepper())
            .await
        {
            Ok(matched) => matched,
            Err(AuthError::CorruptCredential) => {
                tracing::error!(
                    user_id = %record.user_id,
                    "Stored password hash is corrupt, treating as failed login"
                );
                false
            }
            Err(e) => return Err(e),
        };

        if !matched {
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.tokens.issue(record.user_name.as_str())?;

        tracing::info!(
            user_id = %record.user_id,
            user_name = %record.user_name,
            expires_at_ms = issued.claims.exp,
            "User logged in"
        );

        Ok(LoginOutput {
            token: issued.token,
            claims: issued.claims,
        })
    }
}
