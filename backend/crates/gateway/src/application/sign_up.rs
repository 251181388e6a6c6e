//! Sign Up Use Case
//!
//! Registers a new member and signs them in automatically.
//!
//! The attempt proceeds through admission, uniqueness, hashing,
//! persistence and automatic sign-in, failing fast at the first gate
//! that rejects it. Once the member row is committed the account exists;
//! a failure while issuing the session is reported alongside the created
//! account, never rolled back.

use std::sync::Arc;

use platform::rate_limit::RateLimitStore;

use crate::application::admission::admit;
use crate::application::config::GatewayConfig;
use crate::application::issue_session::{IssuedSession, SessionIssuer};
use crate::domain::entity::member::Member;
use crate::domain::repository::{MemberRepository, SessionRepository};
use crate::domain::value_object::{
    card_ref::CardRef,
    email::Email,
    full_name::FullName,
    member_password::{MemberPassword, RawPassword},
    university_id::UniversityId,
};
use crate::error::{GatewayError, GatewayResult};
use kernel::id::MemberId;

/// Sign up input
pub struct SignUpInput {
    pub full_name: String,
    pub email: String,
    pub university_id: i64,
    pub password: String,
    pub university_card_ref: String,
}

/// How the automatic sign-in after registration ended
#[derive(Debug)]
pub enum SessionOutcome {
    /// Session issued, token ready for the cookie
    Established(IssuedSession),
    /// Account exists but no session; the member must sign in manually
    Failed(GatewayError),
}

/// Sign up output
///
/// Present whenever the account was created, including when the
/// follow-up session could not be issued.
#[derive(Debug)]
pub struct SignUpOutput {
    pub member_id: MemberId,
    pub session: SessionOutcome,
}

/// Sign up use case
pub struct SignUpUseCase<M, S, L>
where
    M: MemberRepository,
    S: SessionRepository,
    L: RateLimitStore,
{
    member_repo: Arc<M>,
    issuer: SessionIssuer<M, S>,
    limiter: Arc<L>,
    config: Arc<GatewayConfig>,
}

impl<M, S, L> SignUpUseCase<M, S, L>
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
        let issuer = SessionIssuer::new(member_repo.clone(), session_repo, config.clone());
        Self {
            member_repo,
            issuer,
            limiter,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: SignUpInput,
        caller_key: &str,
        client_ip: Option<String>,
    ) -> GatewayResult<SignUpOutput> {
        // Count the attempt before any credential work
        admit(self.limiter.as_ref(), &self.config.rate_limit, caller_key).await?;

        // Validate fields
        let full_name = FullName::new(&input.full_name)?;
        let email = Email::new(&input.email)?;
        let university_id = UniversityId::new(input.university_id)?;
        let card_ref = CardRef::new(&input.university_card_ref)?;

        // Advisory pre-check; the store constraint remains the authority
        if self.member_repo.exists_by_email(email.as_str()).await? {
            return Err(GatewayError::DuplicateIdentity);
        }

        // Validate and hash password
        let raw_password = RawPassword::new(input.password.clone())?;
        let password_digest =
            MemberPassword::from_raw(&raw_password, &self.config.work_factor, self.config.pepper())?;

        // Persist; a concurrent duplicate surfaces here as DuplicateIdentity
        let member = Member::new(full_name, email, university_id, password_digest, card_ref);
        self.member_repo.insert(&member).await?;

        tracing::info!(
            member_id = %member.member_id,
            "Member registered"
        );

        // Automatic sign-in with the same credentials. The account is
        // committed; a failure here is reported, not rolled back.
        let session = match self
            .issuer
            .authenticate(member.email.as_str(), &input.password, client_ip)
            .await
        {
            Ok(issued) => SessionOutcome::Established(issued),
            Err(e) => {
                tracing::warn!(
                    member_id = %member.member_id,
                    error = %e,
                    "Automatic sign-in failed after registration"
                );
                SessionOutcome::Failed(GatewayError::SessionError)
            }
        };

        Ok(SignUpOutput {
            member_id: member.member_id,
            session,
        })
    }
}
