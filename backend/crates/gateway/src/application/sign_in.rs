//! Sign In Use Case
//!
//! Authenticates a member and issues a session.

use std::sync::Arc;

use platform::rate_limit::RateLimitStore;

use crate::application::admission::admit;
use crate::application::config::GatewayConfig;
use crate::application::issue_session::{IssuedSession, SessionIssuer};
use crate::domain::repository::{MemberRepository, SessionRepository};
use crate::error::GatewayResult;

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<M, S, L>
where
    M: MemberRepository,
    S: SessionRepository,
    L: RateLimitStore,
{
    issuer: SessionIssuer<M, S>,
    limiter: Arc<L>,
    config: Arc<GatewayConfig>,
}

impl<M, S, L> SignInUseCase<M, S, L>
where
    M: MemberRepository,
    S: SessionRepository,
    L: RateLimitStore,
{
    pub fn new(
        member_repo: Arc<M>,
        session_repo: Arc<S>,
        limiter: Arc<L>,
        config: Arc<GatewayConfig>,
    ) -> Self {
        let issuer = SessionIssuer::new(member_repo, session_repo, config.clone());
        Self {
            issuer,
            limiter,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: SignInInput,
        caller_key: &str,
        client_ip: Option<String>,
    ) -> GatewayResult<IssuedSession> {
        // Count the attempt whether or not the credentials are valid
        admit(self.limiter.as_ref(), &self.config.rate_limit, caller_key).await?;

        self.issuer
            .authenticate(&input.email, &input.password, client_ip)
            .await
    }
}
