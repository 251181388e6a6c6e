//! Session Entity
//!
//! Opaque, time-bounded proof of authenticated identity. Created by the
//! session issuer; the cookie/header transport is the delivery layer's
//! concern.

use chrono::{DateTime, Duration, Utc};
use kernel::id::{MemberId, SessionId};

/// Session entity
#[derive(Debug, Clone)]
pub struct Session {
    /// Session ID (UUID v4)
    pub session_id: SessionId,
    /// Subject identity reference
    pub member_id: MemberId,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Client IP at issuance (optional, for logging)
    pub client_ip: Option<String>,
    /// Issuance timestamp
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session
    ///
    /// TTL comes from the application layer (config), not hard-coded here.
    pub fn new(member_id: MemberId, client_ip: Option<String>, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: SessionId::new(),
            member_id,
            expires_at_ms: (now + ttl).timestamp_millis(),
            client_ip,
            created_at: now,
        }
    }

    /// Check if session has expired
    ///
    /// Inclusive at the boundary: a session is invalid from its expiry
    /// millisecond onward, so a zero TTL never admits anything.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() >= self.expires_at_ms
    }

    /// Get remaining time until expiration
    pub fn remaining_ms(&self) -> i64 {
        let now_ms = Utc::now().timestamp_millis();
        (self.expires_at_ms - now_ms).max(0)
    }
}
