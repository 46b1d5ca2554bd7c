//! Session sync for the embedded DTrader iframe.
//!
//! Derives the iframe URL from the login the host page keeps in browser
//! storage, checks the destination against a trust allow-list, and re-derives
//! it whenever the login changes (storage events from other tabs, or a
//! periodic re-check for same-tab writes).
//!
//! Nothing here touches the DOM: storage is injected through
//! [`KeyValueStore`] and timers through [`Ticker`], so the whole pipeline
//! runs natively under test.

pub mod account;
pub mod compose;
pub mod config;
pub mod driver;
pub mod error;
pub mod lifecycle;
pub mod state;
pub mod storage;
pub mod trust;
pub mod watcher;

pub use account::CredentialResolver;
pub use account::Credentials;
pub use account::Resolution;
pub use compose::compose;
pub use compose::ComposedUrl;
pub use config::SyncConfig;
pub use driver::drive;
pub use driver::Ticker;
pub use error::ConfigError;
pub use error::StorageError;
pub use error::SyncError;
pub use lifecycle::Liveness;
pub use lifecycle::Teardown;
pub use state::SyncState;
pub use state::SyncStatus;
pub use storage::KeyValueStore;
pub use storage::MemoryStore;
pub use trust::is_trusted;
pub use watcher::ChangeWatcher;
pub use watcher::Trigger;
