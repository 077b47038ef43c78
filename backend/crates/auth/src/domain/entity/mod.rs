//! Entity Module

pub mod token_claims;
pub mod user_record;
