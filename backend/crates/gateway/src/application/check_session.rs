//! Check Session Use Case
//!
//! Verifies a session token and returns the current session info.

use std::sync::Arc;

use crate::application::config::GatewayConfig;
use crate::application::session_token::parse_session_token;
use crate::domain::entity::session::Session;
use crate::domain::repository::SessionRepository;
use crate::error::{GatewayError, GatewayResult};

/// Session info output
pub struct SessionInfoOutput {
    pub member_id: String,
    pub expires_at_ms: i64,
}

/// Check session use case
pub struct CheckSessionUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<GatewayConfig>,
}

impl<S> CheckSessionUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<GatewayConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Check if session is valid and return session info
    pub async fn execute(&self, session_token: &str) -> GatewayResult<SessionInfoOutput> {
        let session = self.get_session(session_token).await?;

        Ok(SessionInfoOutput {
            member_id: session.member_id.to_string(),
            expires_at_ms: session.expires_at_ms,
        })
    }

    /// Just check if session is valid (returns bool)
    pub async fn is_valid(&self, session_token: &str) -> bool {
        self.get_session(session_token).await.is_ok()
    }

    /// Resolve a token to its stored session
    ///
    /// An expired session is deleted on sight and reported invalid.
    pub async fn get_session(&self, session_token: &str) -> GatewayResult<Session> {
        let session_id = parse_session_token(session_token, &self.config.session_secret)?;

        let session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(GatewayError::SessionInvalid)?;

        if session.is_expired() {
            self.session_repo.delete(session_id).await?;
            return Err(GatewayError::SessionInvalid);
        }

        Ok(session)
    }
}
