// ============================
// riskreg-backend-lib/src/auth/credentials.rs
// ============================
//! The single fixed credential pair and its verifier.
use std::fmt;

use zeroize::Zeroizing;

/// Username accepted when no other is configured
pub const DEFAULT_USERNAME: &str = "admin";

/// Password accepted when no other is configured
pub const DEFAULT_PASSWORD: &str = "123456";

/// The credential pair, immutable for the lifetime of the process.
/// The password is wiped from memory on drop.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Exact match on both fields
    pub fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password.as_str()
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
