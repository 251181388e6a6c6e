//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id with a tunable work factor)
//! - Cookie management
//! - Rate limiting infrastructure
//! - Caller-address resolution

pub mod client;
pub mod cookie;
pub mod password;
pub mod rate_limit;
