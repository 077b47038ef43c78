//! User Password Value Object
//!
//! Domain wrappers over `platform::password`.
//!
//! - [`RawPassword`]: validated user input, zeroized on drop
//! - [`UserPassword`]: Argon2id PHC string with embedded salt, safe to store
//!
//! Hashing and verification are `async` because they run on the blocking pool.

use platform::password::{
    ClearTextPassword, HashedPassword, PasswordPolicyError, equalize_timing, hash_blocking,
    verify_blocking,
};
use std::fmt;

use crate::error::{AuthError, AuthResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Validate user input
    ///
    /// ## Errors
    /// `AuthError::Validation` with a user-facing message
    pub fn new(raw: String) -> AuthResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordPolicyError::EmptyOrWhitespace => {
                AuthError::Validation("Password is required".to_string())
            }
            other => AuthError::Validation(other.to_string()),
        })?;

        Ok(Self(clear_text))
    }

    /// Burn one hash worth of CPU time without producing anything.
    pub async fn equalize_timing(self, pepper: Option<&[u8]>) {
        equalize_timing(self.0, pepper.map(<[u8]>::to_vec)).await;
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed user password for database storage
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password with a fresh random salt
    pub async fn hash(raw: RawPassword, pepper: Option<&[u8]>) -> AuthResult<Self> {
        let hashed = hash_blocking(raw.0, pepper.map(<[u8]>::to_vec)).await?;
        Ok(Self(hashed))
    }

    /// Wrap a stored PHC string. Corruption surfaces on [`UserPassword::verify`].
    pub fn from_db(phc_string: impl Into<String>) -> Self {
        Self(HashedPassword::from_stored(phc_string))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Salt embedded in the PHC string
    pub fn salt(&self) -> Option<String> {
        self.0.salt()
    }

    /// Verify a raw password against this hash in constant time
    ///
    /// ## Errors
    /// `AuthError::CorruptCredential` if the stored hash is malformed
    pub async fn verify(&self, raw: RawPassword, pepper: Option<&[u8]>) -> AuthResult<bool> {
        let matched = verify_blocking(self.0.clone(), raw.0, pepper.map(<[u8]>::to_vec)).await?;
        Ok(matched)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
