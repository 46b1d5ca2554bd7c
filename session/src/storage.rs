//! Read-only access to the host page's persisted login state.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

use crate::error::StorageError;

/// Key holding the login id of the active account.
pub const ACTIVE_LOGINID_KEY: &str = "active_loginid";

/// Key holding the JSON map of login id to `{ token, currency, .. }`.
pub const CLIENT_ACCOUNTS_KEY: &str = "client.accounts";

/// The keys whose change notifications cause a re-check.
pub const WATCHED_KEYS: [&str; 2] = [ACTIVE_LOGINID_KEY, CLIENT_ACCOUNTS_KEY];

/// Whether a storage change notification for `key` should trigger a re-check.
///
/// `None` is what the browser reports when the whole storage area was
/// cleared, which also drops the login.
pub fn is_watched_key(key: Option<&str>) -> bool {
    match key {
        Some(key) => WATCHED_KEYS.contains(&key),
        None => true,
    }
}

/// A string key-value store the credential resolver reads from.
///
/// In the browser this is `localStorage` or `sessionStorage`; tests and
/// native builds use [`MemoryStore`]. Nothing in this crate writes to it.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
}

/// A thread-safe in-memory [`KeyValueStore`]. Clones share the same entries,
/// so a test can keep one handle to mutate while the watcher holds another.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_item(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.into(), value.into());
        }
    }

    pub fn remove_item(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let store = Self::new();
        for (k, v) in iter {
            store.set_item(k, v);
        }
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|e| StorageError::Read {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        Ok(entries.get(key).cloned())
    }
}
