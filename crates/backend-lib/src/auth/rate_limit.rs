// ============================
// crates/backend-lib/src/auth/rate_limit.rs
// ============================
//! Rate limiting for login attempts.
//!
//! A lockout is a pure function of time: once `now >= blockedUntil` the actor
//! is free to try again, with no transition call needed.

use std::time::Duration;

use ::metrics::counter;
use riskreg_common::EpochMillis;
use tracing::{info, warn};

use super::ledger::Ledger;
use super::token_generator::TokenGenerator;
use crate::metrics::LOGIN_LOCKOUT;
use crate::storage::{LedgerStore, KEY_ATTEMPTS, KEY_BLOCKED_UNTIL};

/// Default number of consecutive failures before lockout
pub const MAX_ATTEMPTS: u32 = 3;

/// Default lockout duration (30 seconds)
pub const LOCKOUT_DURATION: Duration = Duration::from_secs(30);

/// Result of recording a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureOutcome {
    /// Whether this failure started a lockout
    pub blocked: bool,
    /// Counter value after the failure (0 once a lockout starts)
    pub attempts: u32,
}

impl<S: LedgerStore, T: TokenGenerator> Ledger<S, T> {
    /// True iff a lockout is recorded and `now` is before its expiry
    pub fn is_blocked(&self, now: EpochMillis) -> bool {
        matches!(self.blocked_until(), Some(until) if now < until)
    }

    /// Whole seconds left on the lockout, rounded up. `None` when not blocked.
    pub fn remaining_block_seconds(&self, now: EpochMillis) -> Option<i64> {
        match self.blocked_until() {
            Some(until) if now < until => Some((until - now + 999) / 1000),
            _ => None,
        }
    }

    /// Record a failed login attempt.
    ///
    /// A lockout is only reported once `blockedUntil` is persisted. If that
    /// write fails the counter is kept instead, so the next failure tries
    /// the lockout again.
    pub fn record_failure(&self, now: EpochMillis) -> FailureOutcome {
        let _guard = self.lock();
        let attempts = self.attempts().saturating_add(1);

        if attempts >= self.lockout.max_attempts {
            let until = now + self.lockout.lockout_duration.as_millis() as EpochMillis;
            if !self.write(KEY_BLOCKED_UNTIL, &until.to_string()) {
                self.write(KEY_ATTEMPTS, &attempts.to_string());
                return FailureOutcome {
                    blocked: false,
                    attempts,
                };
            }
            // A fresh count starts once the lockout expires
            self.erase(KEY_ATTEMPTS);

            counter!(LOGIN_LOCKOUT).increment(1);
            info!(blocked_until = until, "login locked out after {attempts} failed attempts");
            return FailureOutcome {
                blocked: true,
                attempts: 0,
            };
        }

        self.write(KEY_ATTEMPTS, &attempts.to_string());
        warn!(attempts, "failed login attempt");
        FailureOutcome {
            blocked: false,
            attempts,
        }
    }

    /// Forget failed attempts and any lockout. Caller holds the op lock.
    pub(super) fn clear_lockout(&self) {
        self.erase(KEY_ATTEMPTS);
        self.erase(KEY_BLOCKED_UNTIL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{LockoutPolicy, RandomTokenGenerator, SessionPolicy};
    use crate::storage::MemoryStore;

    const T0: EpochMillis = 1_700_000_000_000;

    #[test]
    fn test_rate_limiter_allows_initial_attempts() {
        let ledger = Ledger::new(MemoryStore::new());
        assert!(!ledger.is_blocked(T0));
        assert_eq!(ledger.remaining_block_seconds(T0), None);
        assert_eq!(ledger.attempts(), 0);
    }

    #[test]
    fn test_rate_limiter_blocks_after_max_attempts() {
        let ledger = Ledger::new(MemoryStore::new());

        assert_eq!(ledger.record_failure(T0), FailureOutcome { blocked: false, attempts: 1 });
        assert_eq!(ledger.record_failure(T0), FailureOutcome { blocked: false, attempts: 2 });
        assert_eq!(ledger.record_failure(T0), FailureOutcome { blocked: true, attempts: 0 });

        assert_eq!(ledger.attempts(), 0);
        assert_eq!(ledger.blocked_until(), Some(T0 + 30_000));
        assert!(ledger.is_blocked(T0));
        assert!(ledger.is_blocked(T0 + 29_999));
        assert!(!ledger.is_blocked(T0 + 30_000));
    }

    #[test]
    fn test_remaining_seconds_round_up() {
        let ledger = Ledger::new(MemoryStore::new());
        for _ in 0..MAX_ATTEMPTS {
            ledger.record_failure(T0);
        }

        assert_eq!(ledger.remaining_block_seconds(T0), Some(30));
        assert_eq!(ledger.remaining_block_seconds(T0 + 1_000), Some(29));
        assert_eq!(ledger.remaining_block_seconds(T0 + 1_001), Some(29));
        assert_eq!(ledger.remaining_block_seconds(T0 + 29_999), Some(1));
        assert_eq!(ledger.remaining_block_seconds(T0 + 30_000), None);
    }

    #[test]
    fn test_custom_policy() {
        let ledger = Ledger::with_policies(
            MemoryStore::new(),
            RandomTokenGenerator::default(),
            LockoutPolicy {
                max_attempts: 1,
                lockout_duration: Duration::from_secs(5),
            },
            SessionPolicy::default(),
        );

        assert!(ledger.record_failure(T0).blocked);
        assert_eq!(ledger.blocked_until(), Some(T0 + 5_000));
    }

    /// Accepts every field except the lockout expiry
    struct LockoutRejectingStore(MemoryStore);

    impl LedgerStore for LockoutRejectingStore {
        fn get(&self, key: &str) -> Result<Option<String>, crate::error::StoreError> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), crate::error::StoreError> {
            if key == KEY_BLOCKED_UNTIL {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded").into());
            }
            self.0.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), crate::error::StoreError> {
            self.0.remove(key)
        }
    }

    #[test]
    fn test_unsaved_lockout_is_not_reported() {
        let ledger = Ledger::new(LockoutRejectingStore(MemoryStore::new()));

        ledger.record_failure(T0);
        ledger.record_failure(T0);
        let outcome = ledger.record_failure(T0);

        assert_eq!(outcome, FailureOutcome { blocked: false, attempts: 3 });
        assert!(!ledger.is_blocked(T0));
        assert_eq!(ledger.attempts(), 3);
        assert_eq!(ledger.record_failure(T0).attempts, 4);
    }

    #[test]
    fn test_garbage_counter_reads_as_zero() {
        let store = MemoryStore::new();
        store.set(KEY_ATTEMPTS, "NaN").unwrap();
        store.set(KEY_BLOCKED_UNTIL, "soon").unwrap();

        let ledger = Ledger::new(store);
        assert_eq!(ledger.attempts(), 0);
        assert!(!ledger.is_blocked(T0));
        assert_eq!(ledger.record_failure(T0).attempts, 1);
    }
}
