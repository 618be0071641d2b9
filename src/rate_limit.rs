use std::collections::HashMap;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

/// Fixed-window request counter keyed by caller identity (client IP).
///
/// Counters live in process memory behind a lock, which makes the limiter
/// correct on a multi-threaded runtime but still instance-local: a
/// multi-instance deployment needs a shared store instead.
pub struct RateLimiter {
    windows: Mutex<HashMap<String, WindowEntry>>,
}

struct WindowEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub retry_after: Duration,
    /// Unix timestamp at which the current window ends.
    pub reset_at_unix: u64,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
        }
    }

    #[tracing::instrument(name = "Rate limit check", skip(self, window))]
    pub async fn check(
        &self,
        key: &str,
        max_requests: u32,
        window: Duration,
    ) -> RateLimitDecision {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let entry = windows
            .entry(key.to_string())
            .or_insert_with(|| WindowEntry {
                count: 0,
                window_start: now,
            });
        if now.duration_since(entry.window_start) >= window {
            entry.count = 0;
            entry.window_start = now;
        }
        let retry_after = window
            .saturating_sub(now.duration_since(entry.window_start));
        let reset_at_unix = SystemTime::now()
            .checked_add(retry_after)
            .and_then(|reset| reset.duration_since(UNIX_EPOCH).ok())
            .map(|since_epoch| since_epoch.as_secs())
            .unwrap_or_default();
        if entry.count >= max_requests {
            tracing::info!("Request denied, window is exhausted.");
            return RateLimitDecision {
                allowed: false,
                limit: max_requests,
                remaining: 0,
                retry_after,
                reset_at_unix,
            };
        }
        entry.count += 1;
        RateLimitDecision {
            allowed: true,
            limit: max_requests,
            remaining: max_requests - entry.count,
            retry_after,
            reset_at_unix,
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
