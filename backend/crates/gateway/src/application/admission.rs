//! Admission Control
//!
//! Shared rate-limit gate for the sign-up and sign-in use cases. Every
//! attempt is counted before any credential work happens, successful or
//! not, so repeated failures burn the caller's budget.

use std::time::{SystemTime, UNIX_EPOCH};

use platform::rate_limit::{RateLimitConfig, RateLimitStore};

use crate::error::{GatewayError, GatewayResult};

/// Count an attempt for `caller_key` and admit or reject it
///
/// Fails closed: if the counting store cannot answer, the attempt is
/// rejected as rate-limited rather than admitted unchecked.
pub(crate) async fn admit<L>(
    limiter: &L,
    config: &RateLimitConfig,
    caller_key: &str,
) -> GatewayResult<()>
where
    L: RateLimitStore,
{
    let result = match limiter.check_and_increment(caller_key, config).await {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(error = %e, "Rate limit store unavailable, rejecting attempt");
            return Err(GatewayError::RateLimited { retry_after: None });
        }
    };

    if !result.allowed {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(result.reset_at_ms);

        return Err(GatewayError::RateLimited {
            retry_after: Some(result.retry_after(now_ms)),
        });
    }

    Ok(())
}
