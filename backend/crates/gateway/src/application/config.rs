//! Application Configuration
//!
//! Configuration for the Gateway application layer.

use std::sync::OnceLock;
use std::time::Duration;

use platform::password::WorkFactor;
use platform::rate_limit::RateLimitConfig;

use crate::domain::value_object::member_password::{MemberPassword, RawPassword};

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Gateway application configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Admission budget per caller key
    pub rate_limit: RateLimitConfig,
    /// Argon2id cost parameters
    pub work_factor: WorkFactor,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Session TTL
    pub session_ttl: Duration,
    /// Session cookie name
    pub session_cookie_name: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Digest verified on unknown-email sign-ins, built once per config
    ///
    /// Lives here rather than in the issuer because handlers construct
    /// a fresh issuer per request; the config is the shared, long-lived
    /// object. Access through [`GatewayConfig::decoy_digest`].
    pub decoy_digest: OnceLock<Option<MemberPassword>>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitConfig::default(),
            work_factor: WorkFactor::default(),
            password_pepper: None,
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(12 * 3600), // 12 hours
            session_cookie_name: "gateway_session".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            decoy_digest: OnceLock::new(),
        }
    }
}

impl GatewayConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie, fast hashing)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Get session TTL in milliseconds
    pub fn session_ttl_ms(&self) -> i64 {
        self.session_ttl.as_millis() as i64
    }

    /// Get session TTL as chrono Duration
    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.session_ttl_ms())
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Digest for verifying against unknown emails
    ///
    /// Hashed once with this config's work factor and pepper, then
    /// reused for the lifetime of the config so the unknown-email path
    /// costs the same single verification as the wrong-password path.
    pub fn decoy_digest(&self) -> Option<&MemberPassword> {
        self.decoy_digest
            .get_or_init(|| {
                RawPassword::new("timing-equalizer-0nly".to_string())
                    .ok()
                    .and_then(|decoy| {
                        MemberPassword::from_raw(&decoy, &self.work_factor, self.pepper()).ok()
                    })
            })
            .as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoy_digest_is_cached() {
        let config = GatewayConfig {
            work_factor: WorkFactor::fast_insecure(),
            ..GatewayConfig::default()
        };

        let first = config.decoy_digest().expect("decoy should hash");
        assert!(std::ptr::eq(first, config.decoy_digest().unwrap()));
    }
}
