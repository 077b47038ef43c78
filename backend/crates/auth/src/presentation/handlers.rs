//! HTTP Handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, FromRequestParts, State};
use axum::http::StatusCode;
use http::request::Parts;
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use platform::bearer::BEARER_SCHEME;
use platform::client::{display_ip, extract_client_ip};

use crate::application::config::AuthConfig;
use crate::application::token_service::TokenService;
use crate::application::{LoginInput, LoginUseCase, RegisterInput, RegisterUseCase};
use crate::domain::repository::CredentialStore;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{CredentialsRequest, LoginResponse, MeResponse, RegisterResponse};
use crate::presentation::middleware::AuthenticatedUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<S>
where
    S: CredentialStore + Clone + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<AuthConfig>,
}

/// Best-effort client address: `X-Forwarded-For`, then the socket peer.
///
/// Absent when neither is available (e.g. router driven without a listener).
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub Option<IpAddr>);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());
        Ok(Self(extract_client_ip(&parts.headers, peer_ip)))
    }
}

/// Unwrap a JSON body, turning extractor rejections into a 400
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AuthResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AuthError::Validation(rejection.body_text()))
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<S>(
    State(state): State<AuthAppState<S>>,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)>
where
    S: CredentialStore + Clone + Send + Sync + 'static,
{
    let req = json_body(body)?;

    let use_case = RegisterUseCase::new(state.store.clone(), state.config.clone());

    let output = use_case
        .execute(RegisterInput {
            user_name: req.username,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            username: output.user_name.into_inner(),
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<S>(
    State(state): State<AuthAppState<S>>,
    ClientIp(client_ip): ClientIp,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> AuthResult<Json<LoginResponse>>
where
    S: CredentialStore + Clone + Send + Sync + 'static,
{
    let req = json_body(body)?;

    let use_case = LoginUseCase::new(
        state.store.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            user_name: req.username,
            password: req.password,
        })
        .await
        .inspect_err(|e| {
            if matches!(e, AuthError::InvalidCredentials) {
                tracing::warn!(client_ip = %display_ip(client_ip), "Failed login");
            }
        })?;

    Ok(Json(LoginResponse {
        token: output.token,
        token_type: BEARER_SCHEME,
        expires_at: output.claims.exp,
    }))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/auth/me (protected)
pub async fn me(user: AuthenticatedUser) -> Json<MeResponse> {
    Json(MeResponse {
        username: user.username,
        expires_at: user.expires_at_ms,
    })
}
