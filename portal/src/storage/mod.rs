//! Durable client storage for the persisted session.
//!
//! A persisted session is exactly two string entries, [`TOKEN_KEY`] and
//! [`USER_KEY`]. Both present means a session was saved; anything else means
//! there is none.

mod file;

pub use self::file::FileStorage;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to commit entry: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// String key/value store that outlives the process.
///
/// Calls are synchronous; implementations must have committed a `set` or
/// `remove` by the time it returns.
pub trait SessionStorage: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage. Clones share the same entries, which lets a caller
/// keep a handle for inspection after giving one to the session store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the lock cannot leave a half-written String.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}
