// ============================
// riskreg-backend-lib/src/auth/session.rs
// ============================
//! Session issuance, lookup and invalidation.
//!
//! The session triple (`authToken`, `user`, `expiresAt`) is stored as three
//! independent fields. The token is written last and removed first, so a
//! reader that sees a token also sees the other two.
use std::time::Duration;

use ::metrics::counter;
use riskreg_common::EpochMillis;
use tracing::{debug, info};

use super::ledger::Ledger;
use super::token_generator::TokenGenerator;
use crate::error::StoreError;
use crate::metrics::SESSION_EXPIRED;
use crate::storage::{LedgerStore, KEY_AUTH_TOKEN, KEY_EXPIRES_AT, KEY_USER};

/// Session TTL (time to live)
pub const SESSION_TTL: Duration = Duration::from_secs(2 * 60 * 60); // 2 hours

/// An active session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token: String,
    pub user: String,
    pub expires_at: EpochMillis,
}

impl<S: LedgerStore, T: TokenGenerator> Ledger<S, T> {
    /// Start a new session for `username`.
    ///
    /// Clears failed attempts and any lockout, then persists a fresh token
    /// expiring `ttl` after `now`. Fails only if the session itself could not
    /// be written, in which case no partial session is left behind.
    pub fn record_success(
        &self,
        username: &str,
        now: EpochMillis,
    ) -> Result<SessionRecord, StoreError> {
        let _guard = self.lock();
        self.clear_lockout();

        let record = SessionRecord {
            token: self.tokens.generate(),
            user: username.to_string(),
            expires_at: now + self.session.ttl.as_millis() as EpochMillis,
        };

        let written = self
            .store
            .set(KEY_EXPIRES_AT, &record.expires_at.to_string())
            .and_then(|()| self.store.set(KEY_USER, &record.user))
            .and_then(|()| self.store.set(KEY_AUTH_TOKEN, &record.token));
        if let Err(e) = written {
            self.clear_session();
            return Err(e);
        }

        info!(user = %record.user, expires_at = record.expires_at, "session started");
        Ok(record)
    }

    /// Drop the session triple. Attempts and lockout are left untouched.
    pub fn invalidate(&self) {
        let _guard = self.lock();
        self.clear_session();
    }

    /// The current session, if any.
    ///
    /// **Side effect:** a session found expired (`now > expiresAt`) or only
    /// partially stored is invalidated before `None` is returned.
    pub fn read_session(&self, now: EpochMillis) -> Option<SessionRecord> {
        let _guard = self.lock();
        let token = self.read(KEY_AUTH_TOKEN)?;

        let (user, expires_at) = match (self.read(KEY_USER), self.read_millis(KEY_EXPIRES_AT)) {
            (Some(user), Some(expires_at)) => (user, expires_at),
            _ => {
                debug!("incomplete session in ledger, clearing it");
                self.clear_session();
                return None;
            },
        };

        if now > expires_at {
            counter!(SESSION_EXPIRED).increment(1);
            debug!(%user, expires_at, "session expired, clearing it");
            self.clear_session();
            return None;
        }

        Some(SessionRecord {
            token,
            user,
            expires_at,
        })
    }

    /// Caller holds the op lock
    fn clear_session(&self) {
        self.erase(KEY_AUTH_TOKEN);
        self.erase(KEY_USER);
        self.erase(KEY_EXPIRES_AT);
    }
}
