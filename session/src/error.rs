//! Error types shared by the session sync pipeline.

use thiserror::Error;

/// Failures surfaced by one run of the resolve-then-compose pipeline.
///
/// The type is `Clone + PartialEq` so it can live inside the reactive
/// [`SyncState`](crate::SyncState) that the UI renders from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The configured base URL failed the trust allow-list check.
    /// Fatal to the run: no URL is produced.
    #[error("untrusted destination: {url}")]
    UntrustedDestination { url: String },

    /// Persisted account data could not be read as expected.
    /// Advisory only; the pipeline falls back to defaults.
    #[error("malformed account data: {0}")]
    MalformedAccountData(String),

    /// Any other unexpected failure while resolving or composing.
    #[error("authentication check failed: {0}")]
    AuthenticationCheckFailed(String),
}

impl SyncError {
    /// The short message shown to the user on the error surface.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UntrustedDestination { .. } => "Invalid DTrader URL",
            Self::MalformedAccountData(_) => "Error loading account information",
            Self::AuthenticationCheckFailed(_) => "Authentication check failed",
        }
    }

    /// Whether the error aborts the run (as opposed to being advisory).
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::MalformedAccountData(_))
    }
}

/// A failure reported by a [`KeyValueStore`](crate::KeyValueStore) backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The storage area itself could not be obtained (e.g. disabled by the browser).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Reading a single key failed.
    #[error("failed to read `{key}`: {reason}")]
    Read { key: String, reason: String },
}

impl From<StorageError> for SyncError {
    fn from(err: StorageError) -> Self {
        Self::AuthenticationCheckFailed(err.to_string())
    }
}

/// An error produced while building a [`SyncConfig`](crate::SyncConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
    #[error("default symbol must not be empty")]
    EmptySymbol,
    #[error("base url must not be empty")]
    EmptyBaseUrl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_malformed_account_data_is_advisory() {
        assert!(!SyncError::MalformedAccountData("x".into()).is_fatal());
        assert!(SyncError::UntrustedDestination { url: "x".into() }.is_fatal());
        assert!(SyncError::AuthenticationCheckFailed("x".into()).is_fatal());
    }

    #[test]
    fn storage_errors_become_authentication_failures() {
        let err: SyncError = StorageError::Unavailable("blocked".into()).into();
        assert_eq!(err.user_message(), "Authentication check failed");
        assert_eq!(
            err.to_string(),
            "authentication check failed: storage unavailable: blocked"
        );
    }
}
