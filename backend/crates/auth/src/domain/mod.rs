//! Domain Layer
//!
//! Contains entities, value objects, and the credential store trait.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{token_claims::TokenClaims, user_record::UserRecord};
pub use repository::{CredentialStore, LocalCredentialStore};
