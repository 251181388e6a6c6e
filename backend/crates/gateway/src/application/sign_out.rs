//! Sign Out Use Case
//!
//! Deletes the caller's session.

use std::sync::Arc;

use crate::application::config::GatewayConfig;
use crate::application::session_token::parse_session_token;
use crate::domain::repository::SessionRepository;
use crate::error::GatewayResult;

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<GatewayConfig>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<GatewayConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Delete the session named by the token
    ///
    /// Invalid tokens are a no-op success; sign-out is idempotent.
    pub async fn execute(&self, session_token: &str) -> GatewayResult<()> {
        let Ok(session_id) = parse_session_token(session_token, &self.config.session_secret)
        else {
            return Ok(());
        };

        self.session_repo.delete(session_id).await?;

        tracing::info!(session_id = %session_id, "Session deleted");

        Ok(())
    }
}
