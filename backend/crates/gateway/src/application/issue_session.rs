//! Session Issuance
//!
//! Authenticates a member by email and password and issues a signed
//! session. Shared by the sign-in use case and by sign-up's automatic
//! sign-in step.

use std::sync::Arc;

use crate::application::config::GatewayConfig;
use crate::application::session_token::sign_session_token;
use crate::domain::entity::session::Session;
use crate::domain::repository::{MemberRepository, SessionRepository};
use crate::domain::value_object::{email::Email, member_password::RawPassword};
use crate::error::{GatewayError, GatewayResult};
use kernel::id::MemberId;

/// Issued session output
#[derive(Debug)]
pub struct IssuedSession {
    pub member_id: MemberId,
    /// Signed token for the cookie
    pub session_token: String,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
}

/// Credential verification and session issuance
pub struct SessionIssuer<M, S>
where
    M: MemberRepository,
    S: SessionRepository,
{
    member_repo: Arc<M>,
    session_repo: Arc<S>,
    config: Arc<GatewayConfig>,
}

impl<M, S> SessionIssuer<M, S>
where
    M: MemberRepository,
    S: SessionRepository,
{
    pub fn new(member_repo: Arc<M>, session_repo: Arc<S>, config: Arc<GatewayConfig>) -> Self {
        Self {
            member_repo,
            session_repo,
            config,
        }
    }

    /// Verify credentials and issue a session
    ///
    /// Unknown email and wrong password both return `InvalidCredentials`
    /// with no observable difference.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        client_ip: Option<String>,
    ) -> GatewayResult<IssuedSession> {
        let email = Email::new(email).map_err(|_| GatewayError::InvalidCredentials)?;
        let raw_password =
            RawPassword::new(password.to_string()).map_err(|_| GatewayError::InvalidCredentials)?;

        let member = self.member_repo.find_by_email(email.as_str()).await?;

        let member = match member {
            Some(member) => member,
            None => {
                self.burn_verification(&raw_password);
                return Err(GatewayError::InvalidCredentials);
            }
        };

        if !member
            .password_digest
            .verify(&raw_password, self.config.pepper())
        {
            return Err(GatewayError::InvalidCredentials);
        }

        let session = Session::new(
            member.member_id,
            client_ip,
            self.config.session_ttl_chrono(),
        );
        self.session_repo.create(&session).await?;

        let session_token = sign_session_token(session.session_id, &self.config.session_secret);

        tracing::info!(
            member_id = %member.member_id,
            session_id = %session.session_id,
            "Session issued"
        );

        Ok(IssuedSession {
            member_id: member.member_id,
            session_token,
            expires_at_ms: session.expires_at_ms,
        })
    }

    /// Run a full Argon2 verification against the config's decoy digest
    ///
    /// The digest is owned by the config, not this issuer, so the cost
    /// of building it is paid once per process rather than once per
    /// request.
    fn burn_verification(&self, raw_password: &RawPassword) {
        if let Some(digest) = self.config.decoy_digest() {
            let _ = digest.verify(raw_password, self.config.pepper());
        }
    }
}
