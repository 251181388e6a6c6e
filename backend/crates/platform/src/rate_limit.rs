//! Rate Limiting Infrastructure
//!
//! Common rate limiting abstractions plus an in-process backend.
//!
//! Admission control uses fixed-window counters keyed by
//! `(caller key, window start)`. Exactly `max_requests` attempts are
//! admitted per window; the next attempt in the same window is rejected.
//! The counter is incremented on every call, whether or not the request
//! later succeeds downstream.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

impl RateLimitResult {
    /// Time until the current window expires, measured from `now_ms`
    pub fn retry_after(&self, now_ms: i64) -> Duration {
        Duration::from_millis((self.reset_at_ms - now_ms).max(0) as u64)
    }
}

/// Trait for rate limit storage backends
///
/// `check_and_increment` must be a single atomic operation against the
/// backing store; a separate read-then-write would undercount under
/// concurrent callers sharing a key.
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Count this attempt and report whether it is admitted
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>>;
}

// ============================================================================
// In-process backend
// ============================================================================

/// Process-local fixed-window counter store
///
/// Suitable for tests and single-instance deployments. Multi-instance
/// deployments should use a shared counting store (see the gateway's
/// Postgres-backed implementation) so all instances see one budget.
#[derive(Debug, Default)]
pub struct MemoryRateLimitStore {
    windows: Mutex<HashMap<String, WindowCounter>>,
}

#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    window_start_ms: i64,
    count: u32,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check-and-increment at an explicit clock reading
    ///
    /// The lock makes increment-and-compare atomic for concurrent callers.
    pub fn check_at(&self, key: &str, config: &RateLimitConfig, now_ms: i64) -> RateLimitResult {
        let window_ms = config.window_ms().max(1);
        let window_start = now_ms - now_ms.rem_euclid(window_ms);

        let mut windows = self.windows.lock().expect("rate limit lock poisoned");

        let counter = windows.entry(key.to_string()).or_insert(WindowCounter {
            window_start_ms: window_start,
            count: 0,
        });

        // Expired window counts as empty
        if counter.window_start_ms != window_start {
            counter.window_start_ms = window_start;
            counter.count = 0;
        }

        counter.count += 1;

        RateLimitResult {
            allowed: counter.count <= config.max_requests,
            remaining: config.max_requests.saturating_sub(counter.count),
            reset_at_ms: window_start + window_ms,
        }
    }

    /// Drop counters whose window ended before `now_ms`
    pub fn evict_stale(&self, now_ms: i64, window_ms: i64) {
        let mut windows = self.windows.lock().expect("rate limit lock poisoned");
        windows.retain(|_, c| c.window_start_ms + window_ms > now_ms);
    }
}

impl RateLimitStore for MemoryRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?
            .as_millis() as i64;

        let result = self.check_at(key, config, now_ms);

        // Keep the map bounded to currently-open windows
        self.evict_stale(now_ms, config.window_ms().max(1));

        Ok(result)
    }
}
