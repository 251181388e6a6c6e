//! Credential Gateway Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Member sign-up with email, university ID and card reference
//! - Sign-in with email + password, automatic sign-in after sign-up
//! - Server-side sessions with HMAC-signed cookie tokens
//! - Per-caller admission control on both credential endpoints
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, digests only at rest
//! - Rate limiter fails closed when its store is unreachable
//! - Unknown email and wrong password are indistinguishable to callers
//! - Duplicate sign-ups are rejected without naming the colliding field

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use infra::postgres::PgGatewayRepository;
pub use presentation::router::gateway_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgGatewayRepository as GatewayStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}
