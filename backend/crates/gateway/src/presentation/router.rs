//! Gateway Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use platform::rate_limit::RateLimitStore;

use crate::application::config::GatewayConfig;
use crate::domain::repository::{MemberRepository, SessionRepository};
use crate::infra::postgres::PgGatewayRepository;
use crate::presentation::handlers::{self, GatewayAppState};

/// Create the gateway router with PostgreSQL repository
pub fn gateway_router(repo: PgGatewayRepository, config: GatewayConfig) -> Router {
    gateway_router_generic(repo, config)
}

/// Create a generic gateway router for any repository implementation
pub fn gateway_router_generic<R>(repo: R, config: GatewayConfig) -> Router
where
    R: MemberRepository + SessionRepository + RateLimitStore + Clone + Send + Sync + 'static,
{
    let state = GatewayAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/signin", post(handlers::sign_in::<R>))
        .route("/signout", post(handlers::sign_out::<R>))
        .route("/status", get(handlers::session_status::<R>))
        .with_state(state)
}
