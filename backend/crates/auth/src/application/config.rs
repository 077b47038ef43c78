//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Minimum token signing secret length in bytes
pub const MIN_TOKEN_SECRET_LEN: usize = 32;

/// Default token lifetime (1 hour)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Longest accepted token lifetime (30 days)
///
/// Keeps `exp` well inside the range a JSON number holds exactly.
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(30 * 24 * 3600);

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 key for signing bearer tokens
    pub token_secret: Vec<u8>,
    /// Lifetime of an issued token
    pub token_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::with_random_secret()
    }
}

impl AuthConfig {
    pub fn new(token_secret: Vec<u8>, token_ttl: Duration) -> Self {
        Self {
            token_secret,
            token_ttl,
            password_pepper: None,
        }
    }

    /// Create config with a random token secret (for development and tests)
    ///
    /// Tokens issued under a random secret do not survive a restart.
    pub fn with_random_secret() -> Self {
        Self::new(
            platform::crypto::random_bytes(MIN_TOKEN_SECRET_LEN),
            DEFAULT_TOKEN_TTL,
        )
    }

    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    pub fn with_pepper(mut self, pepper: Vec<u8>) -> Self {
        self.password_pepper = Some(pepper);
        self
    }

    /// Get token TTL in milliseconds
    pub fn token_ttl_ms(&self) -> i64 {
        i64::try_from(self.token_ttl.as_millis()).unwrap_or(i64::MAX)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
