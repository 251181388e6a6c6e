//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use kernel::id::{MemberId, SessionId};
use platform::rate_limit::{RateLimitConfig, RateLimitResult, RateLimitStore};

use crate::domain::entity::{member::Member, session::Session};
use crate::domain::repository::{MemberRepository, SessionRepository};
use crate::domain::value_object::{
    card_ref::CardRef, email::Email, full_name::FullName, member_password::MemberPassword,
    university_id::UniversityId,
};
use crate::error::GatewayResult;

/// PostgreSQL-backed gateway repository
#[derive(Clone)]
pub struct PgGatewayRepository {
    pool: PgPool,
}

impl PgGatewayRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up expired sessions and stale rate limit windows
    pub async fn cleanup_expired(&self, window_ms: i64) -> GatewayResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let sessions = sqlx::query("DELETE FROM member_sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        let windows =
            sqlx::query("DELETE FROM gateway_rate_limits WHERE window_start_ms + $1 < $2")
                .bind(window_ms)
                .bind(now_ms)
                .execute(&self.pool)
                .await?
                .rows_affected();

        tracing::info!(
            sessions_deleted = sessions,
            windows_deleted = windows,
            "Cleaned up expired gateway rows"
        );

        Ok(sessions + windows)
    }
}

// ============================================================================
// Member Repository Implementation
// ============================================================================

impl MemberRepository for PgGatewayRepository {
    async fn insert(&self, member: &Member) -> GatewayResult<()> {
        sqlx::query(
            r#"
            INSERT INTO members (
                member_id,
                full_name,
                email,
                university_id,
                password_digest,
                university_card_ref,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(member.member_id.as_uuid())
        .bind(member.full_name.as_str())
        .bind(member.email.as_str())
        .bind(member.university_id.as_i64())
        .bind(member.password_digest.as_phc_string())
        .bind(member.university_card_ref.as_str())
        .bind(member.created_at)
        .bind(member.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> GatewayResult<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT
                member_id,
                full_name,
                email,
                university_id,
                password_digest,
                university_card_ref,
                created_at,
                updated_at
            FROM members
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_member()).transpose()
    }

    async fn exists_by_email(&self, email: &str) -> GatewayResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM members WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgGatewayRepository {
    async fn create(&self, session: &Session) -> GatewayResult<()> {
        sqlx::query(
            r#"
            INSERT INTO member_sessions (
                session_id,
                member_id,
                expires_at_ms,
                client_ip,
                created_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(session.member_id.as_uuid())
        .bind(session.expires_at_ms)
        .bind(session.client_ip.as_deref())
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, session_id: SessionId) -> GatewayResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                member_id,
                expires_at_ms,
                client_ip,
                created_at
            FROM member_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn delete(&self, session_id: SessionId) -> GatewayResult<()> {
        sqlx::query("DELETE FROM member_sessions WHERE session_id = $1")
            .bind(session_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_expired(&self) -> GatewayResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM member_sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}

// ============================================================================
// Rate Limit Store Implementation
// ============================================================================

impl RateLimitStore for PgGatewayRepository {
    /// Atomic upsert: one round trip both counts the attempt and reads
    /// the resulting count, so concurrent callers cannot undercount.
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
        let window_ms = config.window_ms().max(1);
        let now_ms = Utc::now().timestamp_millis();
        let window_start = now_ms - now_ms.rem_euclid(window_ms);

        let row = sqlx::query_as::<_, (i32,)>(
            r#"
            INSERT INTO gateway_rate_limits (caller_key, window_start_ms, request_count)
            VALUES ($1, $2, 1)
            ON CONFLICT (caller_key, window_start_ms)
            DO UPDATE SET request_count = gateway_rate_limits.request_count + 1
            RETURNING request_count
            "#,
        )
        .bind(key)
        .bind(window_start)
        .fetch_one(&self.pool)
        .await?;

        let count = row.0 as u32;

        Ok(RateLimitResult {
            allowed: count <= config.max_requests,
            remaining: config.max_requests.saturating_sub(count),
            reset_at_ms: window_start + window_ms,
        })
    }
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct MemberRow {
    member_id: Uuid,
    full_name: String,
    email: String,
    university_id: i64,
    password_digest: String,
    university_card_ref: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MemberRow {
    fn into_member(self) -> GatewayResult<Member> {
        Ok(Member {
            member_id: MemberId::from_uuid(self.member_id),
            full_name: FullName::from_db(self.full_name),
            email: Email::from_db(self.email),
            university_id: UniversityId::from_db(self.university_id),
            password_digest: MemberPassword::from_phc_string(self.password_digest)?,
            university_card_ref: CardRef::from_db(self.university_card_ref),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    member_id: Uuid,
    expires_at_ms: i64,
    client_ip: Option<String>,
    created_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            session_id: SessionId::from_uuid(self.session_id),
            member_id: MemberId::from_uuid(self.member_id),
            expires_at_ms: self.expires_at_ms,
            client_ip: self.client_ip,
            created_at: self.created_at,
        }
    }
}
