// ==============================
// tests/storage.rs
// ==============================
//! Flat-file ledger persistence across "reloads" and store failure handling.
use std::io;
use std::sync::Arc;
use std::time::Duration;

use riskreg_backend_lib::auth::{AuthService, Credentials, Ledger, LoginService};
use riskreg_backend_lib::clock::ManualClock;
use riskreg_backend_lib::error::{AuthError, StoreError};
use riskreg_backend_lib::storage::{
    FlatFileStore, LedgerStore, KEY_ATTEMPTS, KEY_AUTH_TOKEN, KEY_BLOCKED_UNTIL, KEY_USER,
};
use tempfile::tempdir;

const T0: i64 = 1_700_000_000_000;

fn service_at(
    dir: &std::path::Path,
    clock: &ManualClock,
) -> LoginService<FlatFileStore, ManualClock> {
    let store = FlatFileStore::new(dir).unwrap();
    LoginService::new(Ledger::new(store), Credentials::default(), clock.clone())
        .with_login_delay(Duration::ZERO)
}

#[test]
fn test_flat_file_fields_are_plain_text() {
    let dir = tempdir().unwrap();
    let store = FlatFileStore::new(dir.path()).unwrap();

    store.set(KEY_ATTEMPTS, "2").unwrap();
    assert_eq!(std::fs::read_to_string(dir.path().join("attempts")).unwrap(), "2");
    assert_eq!(store.get(KEY_ATTEMPTS).unwrap().as_deref(), Some("2"));

    store.set(KEY_ATTEMPTS, "1").unwrap();
    assert_eq!(store.get(KEY_ATTEMPTS).unwrap().as_deref(), Some("1"));

    store.remove(KEY_ATTEMPTS).unwrap();
    store.remove(KEY_ATTEMPTS).unwrap();
    assert_eq!(store.get(KEY_ATTEMPTS).unwrap(), None);
}

#[test]
fn test_concurrent_writers_never_fail_or_mix_values() {
    let dir = tempdir().unwrap();
    let values = ["1700000000000", "9"];

    let handles: Vec<_> = values
        .into_iter()
        .map(|value| {
            // Separate store instances, as two processes would have
            let store = FlatFileStore::new(dir.path()).unwrap();
            std::thread::spawn(move || {
                for _ in 0..2_000 {
                    store.set(KEY_BLOCKED_UNTIL, value).unwrap();
                    let read = store.get(KEY_BLOCKED_UNTIL).unwrap().unwrap();
                    assert!(values.contains(&read.as_str()), "mixed value: {read}");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // No temp files left behind
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_session_survives_reload() {
    let dir = tempdir().unwrap();
    let clock = ManualClock::new(T0);

    let reply = service_at(dir.path(), &clock).login("admin", "123456").await.unwrap();

    // A fresh service over the same directory sees the same session
    let reloaded = service_at(dir.path(), &clock);
    assert!(reloaded.is_authenticated());
    assert_eq!(reloaded.current_session().unwrap().token, reply.token);

    reloaded.logout();
    assert!(!service_at(dir.path(), &clock).is_authenticated());
}

#[tokio::test]
async fn test_lockout_survives_reload() {
    let dir = tempdir().unwrap();
    let clock = ManualClock::new(T0);

    for _ in 0..3 {
        let _ = service_at(dir.path(), &clock).login("admin", "bad").await;
    }

    clock.advance(Duration::from_secs(10));
    let err = service_at(dir.path(), &clock).login("admin", "123456").await.unwrap_err();
    assert!(matches!(err, AuthError::Throttled { remaining_secs: 20 }));
}

/// Store whose every operation fails
struct BrokenStore;

impl LedgerStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "storage disabled").into())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(io::Error::new(io::ErrorKind::Other, "quota exceeded").into())
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(io::Error::new(io::ErrorKind::Other, "quota exceeded").into())
    }
}

#[tokio::test]
async fn test_unavailable_store_means_no_session_no_lockout() {
    let clock = ManualClock::new(T0);
    let svc = LoginService::new(Ledger::new(BrokenStore), Credentials::default(), clock)
        .with_login_delay(Duration::ZERO);

    assert!(!svc.is_authenticated());
    assert!(svc.logout().success);

    // Failures cannot be counted, so nothing ever locks
    for _ in 0..5 {
        let err = svc.login("admin", "bad").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    // A session that cannot be persisted is not reported as a success
    let err = svc.login("admin", "123456").await.unwrap_err();
    assert!(matches!(err, AuthError::Storage(_)));
}

/// Store that accepts everything except the session token
struct TokenRejectingStore(riskreg_backend_lib::storage::MemoryStore);

impl LedgerStore for TokenRejectingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.0.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if key == KEY_AUTH_TOKEN {
            return Err(io::Error::new(io::ErrorKind::Other, "quota exceeded").into());
        }
        self.0.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.0.remove(key)
    }
}

#[tokio::test]
async fn test_failed_session_write_leaves_no_partial_state() {
    let store = Arc::new(TokenRejectingStore(Default::default()));
    let svc = LoginService::new(Ledger::new(store.clone()), Credentials::default(), ManualClock::new(T0))
        .with_login_delay(Duration::ZERO);

    assert!(svc.login("admin", "123456").await.is_err());
    assert_eq!(store.get(KEY_USER).unwrap(), None);
    assert!(store.0.snapshot().is_empty());
}
