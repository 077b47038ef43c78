//! Password Hashing and Verification
//!
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Fresh random salt per hash, embedded in the PHC string
//! - Zeroization of clear text on drop
//! - Constant-time comparison (inside `argon2`)
//! - Blocking work offloaded to the tokio blocking pool
//!
//! ## Examples
//! ```rust
//! use platform::password::ClearTextPassword;
//!
//! let password = ClearTextPassword::new("correct horse".to_string()).unwrap();
//! let hashed = password.hash(None).unwrap();
//! assert!(hashed.verify(&password, None).unwrap());
//! ```

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Maximum password length in characters. Bounds the hashing cost of a single request.
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is too long
    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    /// Password is empty or contains only whitespace
    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    /// Password contains control characters
    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored hash is not a parseable PHC string
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Not `Clone`, and its `Debug` output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password with validation
    ///
    /// Unicode is NFKC-normalized first, so visually identical input hashes
    /// identically regardless of how the client composed it.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = normalized.chars().count();
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        // Space, tab and newline are fine; other control characters are not
        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(Self(normalized))
    }

    #[cfg(test)]
    pub fn new_unchecked(raw: String) -> Self {
        Self(raw)
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Vec<u8> {
        let mut bytes = self.0.as_bytes().to_vec();
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }

    /// Hash the password using Argon2id with a freshly generated salt
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let mut password_bytes = self.peppered(pepper);

        // 128-bit random salt
        let salt = SaltString::generate(OsRng);

        // OWASP recommended Argon2id parameters: m=19456 (19 MiB), t=2, p=1
        let result = Argon2::default()
            .hash_password(&password_bytes, &salt)
            .map(|hash| HashedPassword {
                hash: hash.to_string(),
            })
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()));

        password_bytes.zeroize();
        result
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// The PHC string carries algorithm, version, cost parameters, salt and
/// digest, so a single column is enough to verify later.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Wrap a stored string without parsing it.
    ///
    /// Parsing is deferred to [`HashedPassword::verify`], which reports a
    /// corrupt record as [`PasswordHashError::InvalidHashFormat`].
    pub fn from_stored(s: impl Into<String>) -> Self {
        Self { hash: s.into() }
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Salt embedded in the PHC string (B64, unpadded)
    pub fn salt(&self) -> Option<String> {
        PasswordHash::new(&self.hash)
            .ok()?
            .salt
            .map(|s| s.as_str().to_string())
    }

    /// Verify a password against this hash
    ///
    /// ## Returns
    /// - `Ok(true)` / `Ok(false)` for match / mismatch
    /// - `Err(InvalidHashFormat)` if the stored hash cannot be parsed
    pub fn verify(
        &self,
        password: &ClearTextPassword,
        pepper: Option<&[u8]>,
    ) -> Result<bool, PasswordHashError> {
        let parsed_hash =
            PasswordHash::new(&self.hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        let mut password_bytes = password.peppered(pepper);
        let matched = Argon2::default()
            .verify_password(&password_bytes, &parsed_hash)
            .is_ok();
        password_bytes.zeroize();

        Ok(matched)
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Blocking pool helpers
// ============================================================================

/// Hash on the blocking pool so Argon2 does not stall async workers.
pub async fn hash_blocking(
    password: ClearTextPassword,
    pepper: Option<Vec<u8>>,
) -> Result<HashedPassword, PasswordHashError> {
    tokio::task::spawn_blocking(move || password.hash(pepper.as_deref()))
        .await
        .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?
}

/// Verify on the blocking pool.
pub async fn verify_blocking(
    hashed: HashedPassword,
    password: ClearTextPassword,
    pepper: Option<Vec<u8>>,
) -> Result<bool, PasswordHashError> {
    tokio::task::spawn_blocking(move || hashed.verify(&password, pepper.as_deref()))
        .await
        .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?
}

/// Spend one full hash on a password that has no stored record.
///
/// Keeps the "unknown user" path as slow as the "wrong password" path.
pub async fn equalize_timing(password: ClearTextPassword, pepper: Option<Vec<u8>>) {
    let _ = hash_blocking(password, pepper).await;
}

// ============================================================================
// Tests
// ============================================================================
