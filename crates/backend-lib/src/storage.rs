// ============================
// riskreg-backend-lib/src/storage.rs
// ============================
//! Ledger store abstraction with in-memory and flat-file implementations.
//!
//! The store is a plain string key/value map. Every field of the ledger is
//! written independently, so a single `set` or `remove` is the unit of
//! atomicity; there are no multi-key transactions.
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tempfile::NamedTempFile;

use crate::error::StoreError;

/// Failed-attempt counter
pub const KEY_ATTEMPTS: &str = "attempts";
/// Lockout expiry, epoch ms
pub const KEY_BLOCKED_UNTIL: &str = "blockedUntil";
/// Bearer token of the current session
pub const KEY_AUTH_TOKEN: &str = "authToken";
/// Username of the current session
pub const KEY_USER: &str = "user";
/// Session expiry, epoch ms
pub const KEY_EXPIRES_AT: &str = "expiresAt";

/// Trait for ledger store backends
pub trait LedgerStore: Send + Sync {
    /// Read a field, `None` when absent
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite a field
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a field. Removing an absent field is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: LedgerStore + ?Sized> LedgerStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    fields: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every field currently held
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.fields.read().clone()
    }
}

impl LedgerStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.fields.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.fields.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.fields.write().remove(key);
        Ok(())
    }
}

/// Flat-file store: one human-readable file per key under `root`
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    root: PathBuf,
}

impl FlatFileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

impl LedgerStore for FlatFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a uniquely named sibling temp file, then rename it over the
    /// target. Concurrent writers never share a temp file.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
