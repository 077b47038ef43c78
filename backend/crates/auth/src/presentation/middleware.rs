//! Auth Middleware
//!
//! Gates protected routes on a valid bearer token and exposes the resolved
//! identity to handlers through [`AuthenticatedUser`].

use axum::extract::{ConnectInfo, FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::request::Parts;
use std::net::SocketAddr;
use std::sync::Arc;

use platform::bearer::extract_bearer_token;
use platform::client::{display_ip, extract_client_ip};

use crate::application::token_service::TokenService;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub tokens: Arc<TokenService>,
}

/// Identity resolved from a verified token. Lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    /// Token expiry (ms since epoch)
    pub expires_at_ms: i64,
}

/// Middleware that requires a valid bearer token
///
/// On any failure the request is answered with 401 and never reaches the
/// inner handler.
pub async fn require_auth(
    State(state): State<AuthMiddlewareState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let verified = extract_bearer_token(req.headers())
        .map_err(AuthError::from)
        .and_then(|token| state.tokens.verify(token));

    let claims = match verified {
        Ok(claims) => claims,
        Err(e) => {
            let peer_ip = req
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.0.ip());
            let client_ip = extract_client_ip(req.headers(), peer_ip);
            tracing::debug!(
                client_ip = %display_ip(client_ip),
                path = %req.uri().path(),
                reason = %e,
                "Rejected protected request"
            );
            return Err(e);
        }
    };

    req.extensions_mut().insert(AuthenticatedUser {
        username: claims.sub,
        expires_at_ms: claims.exp,
    });

    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}
