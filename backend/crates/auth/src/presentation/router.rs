//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token_service::TokenService;
use crate::domain::repository::CredentialStore;
use crate::infra::postgres::PgCredentialStore;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_auth};

/// Create the Auth router with the PostgreSQL credential store
pub fn auth_router(store: PgCredentialStore, config: AuthConfig) -> Router {
    auth_router_generic(store, config)
}

/// Create a generic Auth router for any credential store implementation
///
/// | Method | Path        | Auth   |
/// |--------|-------------|--------|
/// | POST   | `/register` | none   |
/// | POST   | `/login`    | none   |
/// | GET    | `/me`       | bearer |
pub fn auth_router_generic<S>(store: S, config: AuthConfig) -> Router
where
    S: CredentialStore + Clone + Send + Sync + 'static,
{
    let tokens = Arc::new(TokenService::new(&config));

    let state = AuthAppState {
        store: Arc::new(store),
        tokens: tokens.clone(),
        config: Arc::new(config),
    };

    // route_layer only wraps routes registered above it
    Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(
            AuthMiddlewareState { tokens },
            require_auth,
        ))
        .route("/register", post(handlers::register::<S>))
        .route("/login", post(handlers::login::<S>))
        .with_state(state)
}
