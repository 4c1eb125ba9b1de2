// ============================
// riskreg-backend-lib/src/lib.rs
// ============================
//! Session and login rate-limiting core of the risk-register editor.
//!
//! A login first consults the [`Ledger`](auth::Ledger) for an active lockout,
//! then judges the credentials, then either records a failure (possibly
//! entering lockout) or starts a new session. Session expiry is evaluated
//! lazily by [`AuthService::is_authenticated`](auth::AuthService).

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod metrics;
pub mod storage;

use std::sync::Arc;

use crate::auth::LoginService;
use crate::config::Settings;
use crate::storage::FlatFileStore;

/// Application state shared by the front ends
#[derive(Clone)]
pub struct AppState<S> {
    /// Login orchestrator
    pub auth: Arc<LoginService<S>>,
    /// Settings the state was built from
    pub settings: Arc<Settings>,
}

impl<S: storage::LedgerStore> AppState<S> {
    /// Create a new application state
    pub fn new(store: S, settings: Settings) -> Self {
        let auth = Arc::new(LoginService::from_settings(store, &settings));
        Self {
            auth,
            settings: Arc::new(settings),
        }
    }
}

impl AppState<FlatFileStore> {
    /// Application state over a flat-file ledger in the configured data dir
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let store = FlatFileStore::new(&settings.data_dir)?;
        Ok(Self::new(store, settings))
    }

    /// Create a new application state with settings loaded from `path`
    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        Self::from_settings(Settings::load_from(path)?)
    }
}
