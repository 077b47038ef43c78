//! Token Claims
//!
//! Payload carried inside a bearer token. Timestamps are milliseconds since
//! the Unix epoch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user name
    pub sub: String,
    /// Issued at (ms)
    pub iat: i64,
    /// Expires at (ms), exclusive
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(sub: impl Into<String>, issued_at: DateTime<Utc>, ttl_ms: i64) -> Self {
        let iat = issued_at.timestamp_millis();
        Self {
            sub: sub.into(),
            iat,
            exp: iat.saturating_add(ttl_ms),
        }
    }

    /// A token is usable only while `now < exp`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() >= self.exp
    }
}
