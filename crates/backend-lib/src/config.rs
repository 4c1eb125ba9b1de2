// ============================
// riskreg-backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! `RISKREG_*` environment variables (nested keys use `__`, e.g.
//! `RISKREG_CREDENTIALS__USERNAME`).
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::credentials::{DEFAULT_PASSWORD, DEFAULT_USERNAME};
use crate::auth::{Credentials, LockoutPolicy, SessionPolicy, DEFAULT_LOGIN_DELAY};


/// Default settings file
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "RISKREG_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding the persisted ledger fields
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Consecutive failures before lockout
    pub max_attempts: u32,
    /// Lockout length in seconds
    pub lockout_secs: u64,
    /// Session TTL in seconds
    pub session_ttl_secs: u64,
    /// Simulated latency of a login attempt in milliseconds
    pub login_delay_ms: u64,
    /// The accepted credential pair
    pub credentials: CredentialSettings,
}

/// Credential pair as it appears in configuration
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialSettings {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSettings")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Default for Settings {
    fn default() -> Self {
        let lockout = LockoutPolicy::default();
        Self {
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            max_attempts: lockout.max_attempts,
            lockout_secs: lockout.lockout_duration.as_secs(),
            session_ttl_secs: SessionPolicy::default().ttl.as_secs(),
            login_delay_ms: DEFAULT_LOGIN_DELAY.as_millis() as u64,
            credentials: CredentialSettings::default(),
        }
    }
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl Settings {
    /// Load from `path` and the environment. A missing file is not an error.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings: Settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!("unknown log level: {}", self.log_level);
        }
        if self.max_attempts == 0 {
            bail!("max_attempts must be at least 1");
        }
        if self.lockout_secs == 0 {
            bail!("lockout_secs must be positive");
        }
        if self.session_ttl_secs == 0 {
            bail!("session_ttl_secs must be positive");
        }
        if self.credentials.username.is_empty() || self.credentials.password.is_empty() {
            bail!("credentials must not be empty");
        }
        Ok(())
    }

    pub fn lockout_policy(&self) -> LockoutPolicy {
        LockoutPolicy {
            max_attempts: self.max_attempts,
            lockout_duration: Duration::from_secs(self.lockout_secs),
        }
    }

    pub fn session_policy(&self) -> SessionPolicy {
        SessionPolicy {
            ttl: Duration::from_secs(self.session_ttl_secs),
        }
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.credentials.username, &self.credentials.password)
    }
}
