//! Caller-supplied settings for the DTrader embed.

use std::env;
use std::time::Duration;

use dioxus_logger::tracing::warn;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;

pub const DEFAULT_DTRADER_URL: &str = "https://deriv-dtrader.vercel.app/dtrader";
pub const DEFAULT_APP_ID: u32 = 110113;
pub const DEFAULT_SYMBOL: &str = "1HZ100V";
pub const DEFAULT_POLL_SECS: u64 = 5;

/// Where the embedded app lives and how often the stored login is re-checked.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Base URL of the embedded trading app, before any query parameters.
    pub dtrader_url: String,
    /// Numeric application id passed through as `app_id`.
    pub app_id: u32,
    /// Instrument shown when the embedded app opens.
    pub default_symbol: String,
    /// Seconds between unconditional re-checks of storage.
    pub poll_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            dtrader_url: DEFAULT_DTRADER_URL.to_string(),
            app_id: DEFAULT_APP_ID,
            default_symbol: DEFAULT_SYMBOL.to_string(),
            poll_secs: DEFAULT_POLL_SECS,
        }
    }
}

impl SyncConfig {
    /// Builds a config from environment variables, falling back to the
    /// in-code defaults for anything unset or unparseable.
    ///
    /// # Environment Variables
    /// - `DTRADER_URL`: base URL of the embedded app.
    /// - `DTRADER_APP_ID`: numeric application id.
    /// - `DTRADER_SYMBOL`: default instrument symbol.
    /// - `DTRADER_POLL_SECS`: re-check interval in seconds, must be non-zero.
    ///
    /// In the browser there is no process environment, so this is
    /// equivalent to [`SyncConfig::default`].
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let dtrader_url = env::var("DTRADER_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.dtrader_url);

        let app_id = parse_var("DTRADER_APP_ID").unwrap_or(defaults.app_id);

        let default_symbol = env::var("DTRADER_SYMBOL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.default_symbol);

        let poll_secs = parse_var::<u64>("DTRADER_POLL_SECS")
            .filter(|secs| *secs > 0)
            .unwrap_or(defaults.poll_secs);

        Self {
            dtrader_url,
            app_id,
            default_symbol,
            poll_secs,
        }
    }

    /// Parses a config handed over by the host page as JSON. Missing fields
    /// take their default value.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the watcher cannot run with.
    ///
    /// Trust of `dtrader_url` is not checked here; an untrusted
    /// destination is reported by the pipeline as an error state instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dtrader_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if self.default_symbol.trim().is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        if self.poll_secs == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_secs)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring invalid {}={:?}, using default", name, raw);
            None
        }
    }
}
