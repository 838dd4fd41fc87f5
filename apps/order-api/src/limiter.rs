//! # Limiter State
//!
//! Process-wide rate-limiter store for the order endpoint.
//!
//! ## Thread Safety
//! The entry map is wrapped in `Mutex` because:
//! 1. Axum serves requests concurrently
//! 2. Read-then-write on a key must be one logical step, or two concurrent
//!    requests can both see an expired window and both reset the counter
//! 3. The critical section is a map lookup plus an insert; contention is
//!    irrelevant at this traffic level
//!
//! ## Why a Trait
//! The store is injectable so a multi-instance deployment can back it with a
//! shared external cache without touching the endpoint. The fixed-window
//! arithmetic itself stays in `order_core::rate_limit` either way.

use std::collections::HashMap;
use std::sync::Mutex;

use order_core::rate_limit::{apply_fixed_window, RateLimitConfig, RateLimitDecision, RateLimitEntry};

/// Key used when the client address cannot be determined or is blank.
const ANONYMOUS_KEY: &str = "anonymous";

// =============================================================================
// Store Trait
// =============================================================================

/// A keyed rate-limit store.
pub trait RateLimitStore: Send + Sync {
    /// Applies one request for `key` at `now_ms` and reports the decision.
    fn check(&self, key: &str, now_ms: u64) -> RateLimitDecision;

    /// Drops all entries. Test/administrative reset only; nothing in the
    /// request path calls this.
    fn clear(&self);
}

// =============================================================================
// In-Memory Implementation
// =============================================================================

/// Fixed-window store backed by a process-local map.
///
/// Entries are created on first request and overwritten when their window
/// expires, never deleted: the map grows with distinct client addresses over
/// the process lifetime. Acceptable for a low-volume single-instance
/// deployment; a horizontally scaled deployment needs a shared store behind
/// the same trait.
pub struct InMemoryRateLimitStore {
    config: RateLimitConfig,
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl InMemoryRateLimitStore {
    pub fn new(config: RateLimitConfig) -> Self {
        InMemoryRateLimitStore {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    fn check(&self, key: &str, now_ms: u64) -> RateLimitDecision {
        let key = if key.trim().is_empty() { ANONYMOUS_KEY } else { key };

        // One lock span covers read, transition, and write-back.
        let mut entries = self.entries.lock().expect("limiter mutex poisoned");
        let (next, decision) = apply_fixed_window(entries.get(key).copied(), now_ms, self.config);
        entries.insert(key.to_string(), next);

        decision
    }

    fn clear(&self) {
        self.entries.lock().expect("limiter mutex poisoned").clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn store(max_requests: u32, window_ms: u64) -> InMemoryRateLimitStore {
        InMemoryRateLimitStore::new(RateLimitConfig {
            max_requests,
            window_ms,
        })
    }

    #[test]
    fn test_keys_are_independent() {
        let store = store(1, 60_000);

        assert!(store.check("10.0.0.1", 0).allowed);
        assert!(store.check("10.0.0.2", 0).allowed);
        assert!(!store.check("10.0.0.1", 1).allowed);
    }

    #[test]
    fn test_blank_key_falls_back_to_anonymous() {
        let store = store(1, 60_000);

        assert!(store.check("", 0).allowed);
        // "  " and "" share the anonymous bucket.
        assert!(!store.check("  ", 1).allowed);
    }

    #[test]
    fn test_deny_then_allow_after_window() {
        let store = store(1, 60_000);

        assert!(store.check("10.0.0.1", 0).allowed);

        let denied = store.check("10.0.0.1", 1);
        assert!(!denied.allowed);
        assert!(denied.retry_after_seconds > 0);

        assert!(store.check("10.0.0.1", 60_001).allowed);
    }

    #[test]
    fn test_clear_resets_all_windows() {
        let store = store(1, 60_000);

        assert!(store.check("10.0.0.1", 0).allowed);
        assert!(!store.check("10.0.0.1", 1).allowed);

        store.clear();
        assert!(store.check("10.0.0.1", 2).allowed);
    }
}
