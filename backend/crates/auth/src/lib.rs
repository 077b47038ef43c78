//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, credential store trait
//! - `application/` - Use cases and the token service
//! - `infra/` - Credential store implementations (PostgreSQL, in-memory)
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Registration and login with username + password
//! - Stateless HMAC-SHA256 bearer tokens with a fixed TTL
//! - Middleware gating protected routes on `Authorization: Bearer <token>`
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, per-record random salt in the PHC string
//! - Wrong password and unknown user are indistinguishable (body and timing)
//! - Token signature is checked before any claim is read
//! - No server-side token state: rotating the secret invalidates all tokens

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::token_service::TokenService;
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryCredentialStore, postgres::PgCredentialStore};
pub use presentation::middleware::{AuthMiddlewareState, AuthenticatedUser, require_auth};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{app_error::AppError, kind::ErrorKind};
