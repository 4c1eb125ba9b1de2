// crates/backend-lib/src/error.rs

//! Central error types for the login core.
use riskreg_common::LoginFailure;
use thiserror::Error;

/// Failures of the persisted ledger store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid ledger key: {0}")]
    InvalidKey(String),
}

/// Rejections of a login attempt
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Login throttled, {remaining_secs}s remaining")]
    Throttled { remaining_secs: i64 },

    #[error("Account locked after repeated failures")]
    AccountLocked,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Ledger store error: {0}")]
    Storage(#[from] StoreError),
}

impl AuthError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "AUTH_001",
            AuthError::AccountLocked => "AUTH_002",
            AuthError::Throttled { .. } => "AUTH_003",
            AuthError::Storage(_) => "STORE_001",
        }
    }

    /// Whether the caller may retry right away
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::InvalidCredentials)
    }

    /// Message suitable for showing to the user.
    ///
    /// Never says which credential field was wrong.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Throttled { remaining_secs } => {
                format!("Too many attempts. Try again in {remaining_secs}s")
            },
            AuthError::AccountLocked => "Account temporarily locked".to_string(),
            AuthError::InvalidCredentials => "Invalid credentials".to_string(),
            AuthError::Storage(_) => "Session could not be saved, please try again".to_string(),
        }
    }
}

impl From<&AuthError> for LoginFailure {
    fn from(err: &AuthError) -> Self {
        LoginFailure::new(err.user_message())
    }
}

impl From<AuthError> for LoginFailure {
    fn from(err: AuthError) -> Self {
        LoginFailure::from(&err)
    }
}
