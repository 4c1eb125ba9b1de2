use std::time::Duration;

use ::metrics::counter;
use async_trait::async_trait;
use riskreg_common::{LoginSuccess, LogoutResponse};
use tracing::{info, instrument, warn};

use super::{AuthService, Credentials, Ledger, RandomTokenGenerator, SessionRecord, TokenGenerator};
use crate::clock::{Clock, SystemClock};
use crate::config::Settings;
use crate::error::AuthError;
use crate::metrics::{LOGIN_FAILURE, LOGIN_SUCCESS, LOGIN_THROTTLED, SESSION_LOGOUT};
use crate::storage::LedgerStore;

/// Simulated network latency before credentials are judged
pub const DEFAULT_LOGIN_DELAY: Duration = Duration::from_millis(400);

/// Login orchestrator over a ledger, the fixed credentials and a clock
pub struct LoginService<S, C = SystemClock, T = RandomTokenGenerator> {
    ledger: Ledger<S, T>,
    credentials: Credentials,
    clock: C,
    login_delay: Duration,
}

impl<S: LedgerStore> LoginService<S> {
    /// Wire up a service from settings with the wall clock
    pub fn from_settings(store: S, settings: &Settings) -> Self {
        let ledger = Ledger::with_policies(
            store,
            RandomTokenGenerator::default(),
            settings.lockout_policy(),
            settings.session_policy(),
        );
        Self::new(ledger, settings.credentials(), SystemClock).with_login_delay(settings.login_delay())
    }
}

impl<S, C, T> LoginService<S, C, T>
where
    S: LedgerStore,
    C: Clock,
    T: TokenGenerator,
{
    pub fn new(ledger: Ledger<S, T>, credentials: Credentials, clock: C) -> Self {
        Self {
            ledger,
            credentials,
            clock,
            login_delay: DEFAULT_LOGIN_DELAY,
        }
    }

    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = delay;
        self
    }

    pub fn ledger(&self) -> &Ledger<S, T> {
        &self.ledger
    }

    /// The current session, with the same expiry side effect as `is_authenticated`
    pub fn current_session(&self) -> Option<SessionRecord> {
        self.ledger.read_session(self.clock.now_millis())
    }
}

#[async_trait]
impl<S, C, T> AuthService for LoginService<S, C, T>
where
    S: LedgerStore,
    C: Clock,
    T: TokenGenerator,
{
    #[instrument(skip(self, password))]
    async fn login(&self, username: &str, password: &str) -> Result<LoginSuccess, AuthError> {
        // A locked-out actor must not learn whether the credentials were right
        if let Some(remaining_secs) = self.ledger.remaining_block_seconds(self.clock.now_millis()) {
            counter!(LOGIN_THROTTLED).increment(1);
            warn!(remaining_secs, "login refused during lockout");
            return Err(AuthError::Throttled { remaining_secs });
        }

        if !self.login_delay.is_zero() {
            tokio::time::sleep(self.login_delay).await;
        }

        let now = self.clock.now_millis();
        if !self.credentials.verify(username, password) {
            counter!(LOGIN_FAILURE).increment(1);
            let outcome = self.ledger.record_failure(now);
            return Err(if outcome.blocked {
                AuthError::AccountLocked
            } else {
                AuthError::InvalidCredentials
            });
        }

        let session = self.ledger.record_success(username, now)?;
        counter!(LOGIN_SUCCESS).increment(1);
        info!("login succeeded");
        Ok(LoginSuccess::new(session.user, session.token, session.expires_at))
    }

    fn is_authenticated(&self) -> bool {
        self.current_session().is_some()
    }

    fn logout(&self) -> LogoutResponse {
        self.ledger.invalidate();
        counter!(SESSION_LOGOUT).increment(1);
        info!("logged out");
        LogoutResponse::default()
    }
}
