// ============================
// riskreg-backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod credentials;
pub mod ledger;
pub mod rate_limit;
pub mod session;
pub mod token_generator;
mod service;
mod service_impl;

pub use credentials::Credentials;
pub use ledger::{Ledger, LockoutPolicy, SessionPolicy};
pub use rate_limit::{FailureOutcome, LOCKOUT_DURATION, MAX_ATTEMPTS};
pub use session::{SessionRecord, SESSION_TTL};
pub use token_generator::{RandomTokenGenerator, TokenGenerator};
pub use service::AuthService;
pub use service_impl::{LoginService, DEFAULT_LOGIN_DELAY};
