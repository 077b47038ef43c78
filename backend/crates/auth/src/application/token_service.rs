//! Token Service
//!
//! Issues and verifies stateless bearer tokens.
//!
//! ## Format
//! `base64url(claims_json) "." base64url(hmac_sha256(secret, base64url(claims_json)))`
//!
//! Both parts use the URL-safe alphabet without padding. The MAC covers the
//! encoded payload exactly as transmitted.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::application::config::AuthConfig;
use crate::domain::entity::token_claims::TokenClaims;
use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// A freshly issued token and the claims it carries
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: TokenClaims,
}

/// Stateless token issuer/verifier
#[derive(Clone)]
pub struct TokenService {
    secret: Vec<u8>,
    ttl_ms: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.token_secret.clone(),
            ttl_ms: config.token_ttl_ms(),
        }
    }

    /// Issue a token for `subject`, valid from now for the configured TTL
    pub fn issue(&self, subject: &str) -> AuthResult<IssuedToken> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> AuthResult<IssuedToken> {
        let claims = TokenClaims::new(subject, now, self.ttl_ms);

        let payload = serde_json::to_vec(&claims)
            .map_err(|e| AuthError::Internal(format!("claims serialization failed: {e}")))?;
        let encoded_payload = URL_SAFE_NO_PAD.encode(payload);

        let mut mac = self.mac()?;
        mac.update(encoded_payload.as_bytes());
        let signature = mac.finalize().into_bytes();

        let token = format!("{}.{}", encoded_payload, URL_SAFE_NO_PAD.encode(signature));

        Ok(IssuedToken { token, claims })
    }

    /// Verify a token against the current time
    pub fn verify(&self, token: &str) -> AuthResult<TokenClaims> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature first, then decode claims, then check expiry.
    ///
    /// ## Errors
    /// - `InvalidToken`: wrong shape, bad signature, undecodable claims
    /// - `ExpiredToken`: authentic but `now >= exp`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<TokenClaims> {
        let (encoded_payload, encoded_signature) =
            token.split_once('.').ok_or(AuthError::InvalidToken)?;
        if encoded_payload.is_empty() || encoded_signature.contains('.') {
            return Err(AuthError::InvalidToken);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(encoded_signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let mut mac = self.mac()?;
        mac.update(encoded_payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let payload = URL_SAFE_NO_PAD
            .decode(encoded_payload)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims: TokenClaims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::InvalidToken)?;

        if claims.is_expired_at(now) {
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims)
    }

    fn mac(&self) -> AuthResult<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AuthError::Internal(format!("invalid token secret: {e}")))
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"[REDACTED]")
            .field("ttl_ms", &self.ttl_ms)
            .finish()
    }
}
