//! Durable storage for the session token.
//!
//! The [`TokenStore`] wraps a string-keyed [`DurableStore`] and keeps the
//! outbound [`Credential`] in step with what was persisted. Three backends
//! are provided: a JSON file in the cache directory, the OS keychain, and an
//! in-memory map for tests.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::Credential;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Keychain service name
const SERVICE_NAME: &str = "passvault";

/// Key under which the session token is stored
pub const TOKEN_KEY: &str = "token";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session file: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// A synchronous get/set/delete string store that survives restarts.
pub trait DurableStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

// ============================================================================
// File backend
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    values: BTreeMap<String, String>,
    updated_at: Option<DateTime<Utc>>,
}

/// Stores values in `session.json` under the cache directory.
pub struct FileStore {
    cache_dir: PathBuf,
}

impl FileStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }

    fn read(&self) -> Result<SessionFile, StoreError> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(SessionFile::default());
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write(&self, file: &SessionFile) -> Result<(), StoreError> {
        let path = self.session_path();
        if file.values.is_empty() {
            if path.exists() {
                std::fs::remove_file(path)?;
            }
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(file)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

impl DurableStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read()?.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking new writes
        let mut file = self.read().unwrap_or_default();
        file.values.insert(key.to_string(), value.to_string());
        file.updated_at = Some(Utc::now());
        self.write(&file)
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        let mut file = self.read().unwrap_or_default();
        file.values.remove(key);
        file.updated_at = Some(Utc::now());
        self.write(&file)
    }
}

// ============================================================================
// Keychain backend
// ============================================================================

/// Stores values in the OS keychain, one entry per key.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry, StoreError> {
        Ok(Entry::new(&self.service, key)?)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DurableStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entry(key)?.set_password(value)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// In-memory store. Clones share contents, which lets a test stand up a
/// second controller over the "same disk".
#[derive(Debug, Clone)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    available: Arc<Mutex<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
            available: Arc::new(Mutex::new(true)),
        }
    }

    /// Simulate the backing storage going away (or coming back).
    pub fn set_available(&self, available: bool) {
        *self.available.lock().unwrap_or_else(|e| e.into_inner()) = available;
    }

    fn check(&self) -> Result<(), StoreError> {
        if *self.available.lock().unwrap_or_else(|e| e.into_inner()) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store disabled".to_string()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DurableStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        Ok(self
            .values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check()?;
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.check()?;
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        Ok(())
    }
}

// ============================================================================
// Token store
// ============================================================================

/// Holder of the persisted session token.
///
/// Owned exclusively by the `SessionController`. Read failures degrade to
/// "no token"; the credential is never attached for a token that could not
/// be read back. A stored token that could not be erased is remembered and
/// erased on a later [`retry_pending_clear`](Self::retry_pending_clear) or
/// when the store is dropped, so a logged-out session is never restored.
pub struct TokenStore {
    backend: Box<dyn DurableStore>,
    credential: Credential,
    pending_clear: bool,
}

impl TokenStore {
    pub fn new(backend: Box<dyn DurableStore>, credential: Credential) -> Self {
        Self {
            backend,
            credential,
            pending_clear: false,
        }
    }

    /// Read the stored token, attaching it to outbound calls if present.
    pub fn load(&self) -> Option<String> {
        match self.backend.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => {
                debug!("Stored session token found");
                self.credential.attach(&token);
                Some(token)
            }
            Ok(_) => {
                debug!("No stored session token");
                self.credential.detach();
                None
            }
            Err(e) => {
                warn!(error = %e, "Token storage unavailable, starting logged out");
                self.credential.detach();
                None
            }
        }
    }

    /// Persist `token` and attach it to outbound calls.
    ///
    /// The credential is attached even when persisting fails, so the current
    /// process keeps working; only a restart loses the session. A previously
    /// stored token is erased in that case rather than left to be restored.
    pub fn save(&mut self, token: &str) -> Result<(), StoreError> {
        self.credential.attach(token);
        match self.backend.set(TOKEN_KEY, token) {
            Ok(()) => {
                self.pending_clear = false;
                Ok(())
            }
            Err(e) => {
                if self.erase().is_err() {
                    self.pending_clear = true;
                }
                Err(e)
            }
        }
    }

    /// Erase the stored token and detach the credential.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.credential.detach();
        match self.erase() {
            Ok(()) => {
                self.pending_clear = false;
                Ok(())
            }
            Err(e) => {
                self.pending_clear = true;
                Err(e)
            }
        }
    }

    /// Delete the slot, falling back to blanking it. `load` reads an empty
    /// value as absent.
    fn erase(&mut self) -> Result<(), StoreError> {
        match self.backend.delete(TOKEN_KEY) {
            Ok(()) => Ok(()),
            Err(e) => {
                debug!(error = %e, "Delete failed, blanking stored token instead");
                self.backend.set(TOKEN_KEY, "").map_err(|_| e)
            }
        }
    }

    /// Retry erasing a token that an earlier clear could not remove.
    /// Returns `true` once nothing is left to erase.
    pub fn retry_pending_clear(&mut self) -> bool {
        if !self.pending_clear {
            return true;
        }
        if self.erase().is_ok() {
            debug!("Stale session token erased");
            self.pending_clear = false;
        }
        !self.pending_clear
    }

    pub fn has_pending_clear(&self) -> bool {
        self.pending_clear
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

impl Drop for TokenStore {
    fn drop(&mut self) {
        if !self.retry_pending_clear() {
            warn!("Stored session token could not be erased");
        }
    }
}
