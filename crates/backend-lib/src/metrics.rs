// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const LOGIN_SUCCESS: &str = "login.success";
pub const LOGIN_FAILURE: &str = "login.failure";
pub const LOGIN_LOCKOUT: &str = "login.lockout";
pub const LOGIN_THROTTLED: &str = "login.throttled";
pub const SESSION_EXPIRED: &str = "session.expired";
pub const SESSION_LOGOUT: &str = "session.logout";
