//! # Fixed-Window Rate Limiting
//!
//! Pure arithmetic for a fixed-window request counter. The shared map of
//! per-client entries lives in the host (see `order-api`'s limiter module);
//! this module only answers "given this entry and this instant, what happens
//! next" so the math stays testable without any shared state.
//!
//! ## Fixed Window vs Sliding
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fixed Window                                     │
//! │                                                                         │
//! │  window_start                          window_start + window_ms         │
//! │       │                                       │                         │
//! │       ▼                                       ▼                         │
//! │  ─────┬───────────────────────────────────────┬──────────────────────   │
//! │       │  count += 1 per request, deny at cap  │  counter resets, new    │
//! │       │                                       │  window starts          │
//! │  ─────┴───────────────────────────────────────┴──────────────────────   │
//! │                                                                         │
//! │  The counter resets entirely at the boundary; it never slides.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// Configuration
// =============================================================================

/// Fixed-window limiter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per window per key.
    pub max_requests: u32,

    /// Window length in milliseconds.
    pub window_ms: u64,
}

impl Default for RateLimitConfig {
    /// 5 requests per 15 minutes, matching the deployed form defaults.
    fn default() -> Self {
        RateLimitConfig {
            max_requests: 5,
            window_ms: 15 * 60 * 1000,
        }
    }
}

// =============================================================================
// Entry & Decision
// =============================================================================

/// Per-key counter state.
///
/// Created on a key's first request, overwritten when its window expires,
/// never deleted. The host map therefore grows with distinct keys over the
/// process lifetime, which is acceptable for a low-traffic form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    /// Millisecond timestamp of the window's first request.
    pub window_start: u64,
}

/// Outcome of one request against the limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,

    /// Requests left in the current window (0 when denied).
    pub remaining: u32,

    /// Whole seconds until the window resets (0 when allowed). Rounded up,
    /// so a denied caller never retries early.
    pub retry_after_seconds: u64,
}

// =============================================================================
// Transition
// =============================================================================

/// Applies one request to a key's window.
///
/// Returns the entry to store and the decision to report. The host must
/// perform the surrounding read-update-write on a key as one logical step
/// (e.g. under a mutex); otherwise two concurrent requests can both observe
/// an expired window and both reset the counter.
pub fn apply_fixed_window(
    entry: Option<RateLimitEntry>,
    now_ms: u64,
    config: RateLimitConfig,
) -> (RateLimitEntry, RateLimitDecision) {
    match entry {
        // First request from this key, or its window has expired: start fresh.
        None => start_window(now_ms, config),
        Some(current) if now_ms.saturating_sub(current.window_start) >= config.window_ms => {
            start_window(now_ms, config)
        }

        // Window still open and the cap is hit: deny, entry unchanged.
        Some(current) if current.count >= config.max_requests => {
            let elapsed = now_ms.saturating_sub(current.window_start);
            let retry_after_ms = config.window_ms.saturating_sub(elapsed);

            (
                current,
                RateLimitDecision {
                    allowed: false,
                    remaining: 0,
                    retry_after_seconds: retry_after_ms.div_ceil(1000),
                },
            )
        }

        // Window still open with room: count the request.
        Some(current) => {
            let updated = RateLimitEntry {
                count: current.count + 1,
                window_start: current.window_start,
            };

            (
                updated,
                RateLimitDecision {
                    allowed: true,
                    remaining: config.max_requests.saturating_sub(updated.count),
                    retry_after_seconds: 0,
                },
            )
        }
    }
}

fn start_window(now_ms: u64, config: RateLimitConfig) -> (RateLimitEntry, RateLimitDecision) {
    let entry = RateLimitEntry {
        count: 1,
        window_start: now_ms,
    };

    let decision = RateLimitDecision {
        allowed: true,
        remaining: config.max_requests.saturating_sub(1),
        retry_after_seconds: 0,
    };

    (entry, decision)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW_MS: u64 = 60_000;

    fn config(max_requests: u32) -> RateLimitConfig {
        RateLimitConfig {
            max_requests,
            window_ms: WINDOW_MS,
        }
    }

    #[test]
    fn test_first_request_starts_window() {
        let (entry, decision) = apply_fixed_window(None, 1_000, config(5));

        assert!(decision.allowed);
        assert_eq!(decision.remaining, 4);
        assert_eq!(decision.retry_after_seconds, 0);
        assert_eq!(entry, RateLimitEntry { count: 1, window_start: 1_000 });
    }

    #[test]
    fn test_deny_then_allow_after_window() {
        let cfg = config(1);

        let (entry, first) = apply_fixed_window(None, 0, cfg);
        assert!(first.allowed);

        let (entry, second) = apply_fixed_window(Some(entry), 1, cfg);
        assert!(!second.allowed);
        assert!(second.retry_after_seconds > 0);
        // Denial leaves the entry untouched.
        assert_eq!(entry.window_start, 0);

        let (entry, third) = apply_fixed_window(Some(entry), WINDOW_MS + 1, cfg);
        assert!(third.allowed);
        assert_eq!(entry.window_start, WINDOW_MS + 1);
        assert_eq!(entry.count, 1);
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let cfg = config(1);
        let (entry, _) = apply_fixed_window(None, 0, cfg);

        // 59_500ms remaining rounds up to a full 60 seconds.
        let (_, denied) = apply_fixed_window(Some(entry), 500, cfg);
        assert!(!denied.allowed);
        assert_eq!(denied.retry_after_seconds, 60);
    }

    #[test]
    fn test_remaining_counts_down() {
        let cfg = config(3);
        let (entry, first) = apply_fixed_window(None, 0, cfg);
        assert_eq!(first.remaining, 2);

        let (entry, second) = apply_fixed_window(Some(entry), 10, cfg);
        assert_eq!(second.remaining, 1);

        let (entry, third) = apply_fixed_window(Some(entry), 20, cfg);
        assert_eq!(third.remaining, 0);
        assert!(third.allowed);

        let (_, fourth) = apply_fixed_window(Some(entry), 30, cfg);
        assert!(!fourth.allowed);
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let cfg = config(1);
        let (entry, _) = apply_fixed_window(None, 0, cfg);

        // Exactly window_ms elapsed counts as expired.
        let (entry, decision) = apply_fixed_window(Some(entry), WINDOW_MS, cfg);
        assert!(decision.allowed);
        assert_eq!(entry.window_start, WINDOW_MS);
    }
}
