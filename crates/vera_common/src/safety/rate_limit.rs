//! Fixed-window rate limiter for request throttling.
//!
//! One window per client: the first request opens it, requests inside it
//! increment a counter, and once the window elapses the next request
//! starts a fresh window with a count of 1. The window does not slide;
//! that keeps refusal timing predictable and is relied on by tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::chat::RateLimitInfo;

/// Requests allowed per client per window.
pub const DEFAULT_LIMIT: u32 = 20;
/// Window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Per-client window state.
#[derive(Debug, Clone)]
struct RateLimitEntry {
    count: u32,
    window_start: Instant,
    last_seen: Instant,
}

/// Result of an admission check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    /// Request is admitted.
    Allowed {
        /// Requests left in the current window.
        remaining: u32,
    },
    /// Request is refused.
    Limited {
        /// Time until the window resets.
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }

    pub fn is_limited(&self) -> bool {
        matches!(self, RateLimitResult::Limited { .. })
    }
}

/// Fixed-window rate limiter keyed by client identifier.
///
/// Explicit process-scoped state: constructed once at startup and passed
/// by reference to the pipeline, never a module-level singleton.
#[derive(Debug)]
pub struct RateLimiter {
    entries: Mutex<HashMap<String, RateLimitEntry>>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            limit,
            window,
        }
    }

    /// Limiter with production defaults (20 req/min).
    pub fn default_limiter() -> Self {
        Self::new(DEFAULT_LIMIT, DEFAULT_WINDOW)
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Admit or refuse a request from `client_id`, counting it if admitted.
    pub fn check(&self, client_id: &str) -> RateLimitResult {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();

        let entry = entries.entry(client_id.to_string()).or_insert(RateLimitEntry {
            count: 0,
            window_start: now,
            last_seen: now,
        });

        // Elapsed window: start fresh rather than sliding.
        if now.duration_since(entry.window_start) >= self.window {
            entry.count = 1;
            entry.window_start = now;
            entry.last_seen = now;
            return RateLimitResult::Allowed {
                remaining: self.limit.saturating_sub(1),
            };
        }

        if entry.count >= self.limit {
            entry.last_seen = now;
            let retry_after = self.window - now.duration_since(entry.window_start);
            return RateLimitResult::Limited { retry_after };
        }

        entry.count += 1;
        entry.last_seen = now;
        RateLimitResult::Allowed {
            remaining: self.limit.saturating_sub(entry.count),
        }
    }

    /// Current standing for a client without consuming a request.
    pub fn info(&self, client_id: &str) -> RateLimitInfo {
        let now = Instant::now();
        let entries = self.entries.lock().unwrap();

        match entries.get(client_id) {
            Some(entry) if now.duration_since(entry.window_start) < self.window => {
                let until_reset = self.window - now.duration_since(entry.window_start);
                RateLimitInfo {
                    remaining: self.limit.saturating_sub(entry.count),
                    reset_at: Utc::now()
                        + chrono::Duration::from_std(until_reset)
                            .unwrap_or_else(|_| chrono::Duration::seconds(0)),
                }
            }
            _ => RateLimitInfo {
                remaining: self.limit,
                reset_at: Utc::now()
                    + chrono::Duration::from_std(self.window)
                        .unwrap_or_else(|_| chrono::Duration::seconds(60)),
            },
        }
    }

    /// User-facing refusal text for a limited request.
    pub fn refusal_message(&self) -> String {
        format!(
            "Too many requests. Please wait a moment before sending more queries. You can send up to {} requests per minute.",
            self.limit
        )
    }

    /// Drop entries idle for more than twice the window length. Called
    /// from a background task; never from the request path.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let max_idle = self.window * 2;
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.last_seen) <= max_idle);
        before - entries.len()
    }

    /// Tracked client count (for monitoring and tests).
    pub fn entry_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::default_limiter()
    }
}

// ============================================================================
// Tests
// ============================================================================
