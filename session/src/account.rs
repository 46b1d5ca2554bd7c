//! Resolves the active account's credentials from persisted storage.

use std::collections::HashMap;
use std::fmt;

use dioxus_logger::tracing::debug;
use dioxus_logger::tracing::warn;
use serde_json::Value;

use crate::error::StorageError;
use crate::error::SyncError;
use crate::storage::KeyValueStore;
use crate::storage::ACTIVE_LOGINID_KEY;
use crate::storage::CLIENT_ACCOUNTS_KEY;

/// Currency used when an account record has none, or one that can't be read.
pub const DEFAULT_CURRENCY: &str = "USD";

/// What the embedded app needs to log the active account in.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub login_id: String,
    pub token: String,
    pub currency: String,
}

// The token is a bearer credential; keep it out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login_id", &self.login_id)
            .field("token", &"<redacted>")
            .field("currency", &self.currency)
            .finish()
    }
}

/// Outcome of one storage read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// `None` means the embed should open anonymously.
    pub credentials: Option<Credentials>,
    /// A non-fatal problem found along the way, e.g. a corrupt account map.
    pub advisory: Option<SyncError>,
}

impl Resolution {
    fn anonymous() -> Self {
        Self::default()
    }

    fn malformed(reason: String) -> Self {
        Self {
            credentials: None,
            advisory: Some(SyncError::MalformedAccountData(reason)),
        }
    }
}

/// Reads the active login from a primary (persistent) store, falling back to
/// a per-tab store for the login id only.
pub struct CredentialResolver<'a> {
    primary: &'a dyn KeyValueStore,
    per_tab: &'a dyn KeyValueStore,
}

impl<'a> CredentialResolver<'a> {
    pub fn new(primary: &'a dyn KeyValueStore, per_tab: &'a dyn KeyValueStore) -> Self {
        Self { primary, per_tab }
    }

    /// Resolves the active account.
    ///
    /// Missing or unusable data never fails the call: it yields no
    /// credentials, plus an advisory when the data was present but corrupt.
    /// Only a failing storage backend is returned as `Err`.
    pub fn resolve(&self) -> Result<Resolution, StorageError> {
        let Some(login_id) = self.active_login_id()? else {
            debug!("no active login id, resolving anonymously");
            return Ok(Resolution::anonymous());
        };
        let Some(accounts_json) = self.primary.get_item(CLIENT_ACCOUNTS_KEY)? else {
            debug!("no stored client accounts, resolving anonymously");
            return Ok(Resolution::anonymous());
        };

        let accounts = match serde_json::from_str::<HashMap<String, Value>>(&accounts_json) {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!("error parsing client accounts: {}", e);
                return Ok(Resolution::malformed(format!("{CLIENT_ACCOUNTS_KEY}: {e}")));
            }
        };

        let Some(record) = accounts.get(&login_id) else {
            debug!("active login {} has no account record", login_id);
            return Ok(Resolution::anonymous());
        };
        let Some(record) = record.as_object() else {
            warn!("account record for {} is not an object", login_id);
            return Ok(Resolution::malformed(format!(
                "record for {login_id} is not an object"
            )));
        };

        let Some(token) = record
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
        else {
            debug!("account record for {} carries no token", login_id);
            return Ok(Resolution::anonymous());
        };

        let (currency, advisory) = match record.get("currency") {
            None | Some(Value::Null) => (DEFAULT_CURRENCY.to_string(), None),
            Some(Value::String(c)) if c.is_empty() => (DEFAULT_CURRENCY.to_string(), None),
            Some(Value::String(c)) => (c.clone(), None),
            Some(other) => {
                warn!(
                    "unreadable currency {} for {}, using {}",
                    other, login_id, DEFAULT_CURRENCY
                );
                (
                    DEFAULT_CURRENCY.to_string(),
                    Some(SyncError::MalformedAccountData(format!(
                        "currency for {login_id}: {other}"
                    ))),
                )
            }
        };

        Ok(Resolution {
            credentials: Some(Credentials {
                login_id,
                token: token.to_string(),
                currency,
            }),
            advisory,
        })
    }

    fn active_login_id(&self) -> Result<Option<String>, StorageError> {
        if let Some(id) = non_empty(self.primary.get_item(ACTIVE_LOGINID_KEY)?) {
            return Ok(Some(id));
        }
        Ok(non_empty(self.per_tab.get_item(ACTIVE_LOGINID_KEY)?))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
