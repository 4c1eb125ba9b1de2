// ============================
// riskreg-backend-lib/src/auth/ledger.rs
// ============================
//! Rate-limit & session ledger.
//!
//! The ledger is the persisted record of failed attempts, lockout expiry and
//! the active session. Lockout operations live in [`super::rate_limit`],
//! session operations in [`super::session`]; this file holds the shared
//! state and the field accessors both use.
//!
//! Store failures never escape a read: a field that cannot be read counts as
//! absent, so an unavailable store looks like "no session, no lockout".
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use riskreg_common::EpochMillis;
use tracing::warn;

use super::rate_limit::{LOCKOUT_DURATION, MAX_ATTEMPTS};
use super::session::SESSION_TTL;
use super::token_generator::{RandomTokenGenerator, TokenGenerator};
use crate::storage::{LedgerStore, KEY_ATTEMPTS, KEY_BLOCKED_UNTIL};

/// Lockout policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    /// Consecutive failures that trigger a lockout
    pub max_attempts: u32,
    /// How long a lockout lasts
    pub lockout_duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            lockout_duration: LOCKOUT_DURATION,
        }
    }
}

/// Session policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Fixed lifetime of a session; activity never extends it
    pub ttl: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self { ttl: SESSION_TTL }
    }
}

/// The ledger over a persisted store
pub struct Ledger<S, T = RandomTokenGenerator> {
    pub(super) store: S,
    pub(super) tokens: T,
    pub(super) lockout: LockoutPolicy,
    pub(super) session: SessionPolicy,
    /// Serialises read-modify-write sequences within this process
    op_lock: Mutex<()>,
}

impl<S: LedgerStore> Ledger<S> {
    /// Ledger with the default policies and token generator
    pub fn new(store: S) -> Self {
        Self::with_policies(
            store,
            RandomTokenGenerator::default(),
            LockoutPolicy::default(),
            SessionPolicy::default(),
        )
    }
}

impl<S: LedgerStore, T: TokenGenerator> Ledger<S, T> {
    pub fn with_policies(
        store: S,
        tokens: T,
        lockout: LockoutPolicy,
        session: SessionPolicy,
    ) -> Self {
        Self {
            store,
            tokens,
            lockout,
            session,
            op_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn lockout_policy(&self) -> LockoutPolicy {
        self.lockout
    }

    pub fn session_policy(&self) -> SessionPolicy {
        self.session
    }

    /// Current failed-attempt counter
    pub fn attempts(&self) -> u32 {
        self.read(KEY_ATTEMPTS)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Lockout expiry, if one was ever recorded and not cleared
    pub fn blocked_until(&self) -> Option<EpochMillis> {
        self.read_millis(KEY_BLOCKED_UNTIL)
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, ()> {
        self.op_lock.lock()
    }

    pub(super) fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "ledger read failed, treating field as absent");
                None
            },
        }
    }

    pub(super) fn read_millis(&self, key: &str) -> Option<EpochMillis> {
        self.read(key).and_then(|v| v.trim().parse().ok())
    }

    /// Best-effort write; failures are logged. Returns whether it stuck.
    pub(super) fn write(&self, key: &str, value: &str) -> bool {
        match self.store.set(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "ledger write failed");
                false
            },
        }
    }

    /// Best-effort removal; failures are logged
    pub(super) fn erase(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!(key, error = %e, "ledger remove failed");
        }
    }
}
