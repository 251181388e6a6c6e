//! Repository Traits
//!
//! Persistence contracts for the credential core. Implementations live
//! in `infra`; tests substitute in-memory fakes.

use kernel::id::SessionId;

use crate::domain::entity::{member::Member, session::Session};
use crate::error::GatewayResult;

/// Member persistence operations
#[trait_variant::make(MemberRepository: Send)]
pub trait LocalMemberRepository {
    /// Insert a new member
    ///
    /// The store's unique constraints on email and university ID are the
    /// authoritative duplicate check; a violation surfaces as
    /// `GatewayError::DuplicateIdentity`.
    async fn insert(&self, member: &Member) -> GatewayResult<()>;

    /// Find a member by normalized email
    async fn find_by_email(&self, email: &str) -> GatewayResult<Option<Member>>;

    /// Advisory pre-check for duplicate email
    ///
    /// Best-effort only; concurrent sign-ups are still decided by the
    /// constraint at insert time.
    async fn exists_by_email(&self, email: &str) -> GatewayResult<bool>;
}

/// Session persistence operations
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Persist a newly issued session
    async fn create(&self, session: &Session) -> GatewayResult<()>;

    /// Find a session by ID
    async fn find_by_id(&self, session_id: SessionId) -> GatewayResult<Option<Session>>;

    /// Delete a session (sign-out)
    async fn delete(&self, session_id: SessionId) -> GatewayResult<()>;

    /// Remove expired sessions, returning the number deleted
    async fn delete_expired(&self) -> GatewayResult<u64>;
}
