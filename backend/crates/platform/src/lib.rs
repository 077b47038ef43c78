//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id, salted PHC strings)
//! - Bearer credential parsing from request headers
//! - Client identification for logging
//! - Random bytes and Base64 helpers

pub mod bearer;
pub mod client;
pub mod crypto;
pub mod password;
