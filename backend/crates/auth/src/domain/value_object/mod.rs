//! Value Object Module

pub mod user_name;
pub mod user_password;

pub use kernel::id::UserId;
