use async_trait::async_trait;
use riskreg_common::{LoginSuccess, LogoutResponse};

use crate::error::AuthError;

/// Public login surface used by the rest of the application
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Attempt a login. May wait for a short simulated delay before deciding.
    async fn login(&self, username: &str, password: &str) -> Result<LoginSuccess, AuthError>;

    /// Whether a non-expired session exists.
    ///
    /// **Side effect:** clears the stored session when it has expired. Call
    /// it on every gate check; nothing expires sessions in the background.
    fn is_authenticated(&self) -> bool;

    /// End the current session, if any. Idempotent.
    fn logout(&self) -> LogoutResponse;
}
