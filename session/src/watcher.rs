//! The change watcher state machine and the pipeline it runs.

use std::rc::Rc;

use dioxus_logger::tracing::debug;
use dioxus_logger::tracing::trace;
use dioxus_logger::tracing::warn;

use crate::account::CredentialResolver;
use crate::compose::compose;
use crate::config::SyncConfig;
use crate::lifecycle::Liveness;
use crate::state::SyncState;
use crate::storage::is_watched_key;
use crate::storage::KeyValueStore;

/// Why the pipeline is being asked to run.
#[derive(Clone, Debug, PartialEq, Eq, strum::EnumIs)]
pub enum Trigger {
    /// The embedding surface was mounted.
    Mount,
    /// Another tab changed storage. `None` means the whole area was cleared.
    StorageChanged(Option<String>),
    /// The periodic re-check fired.
    Tick,
    /// The user pressed retry on the error surface.
    Retry,
}

impl Trigger {
    /// Whether this trigger should cause a re-run. Storage changes to
    /// unrelated keys are ignored.
    pub fn is_relevant(&self) -> bool {
        match self {
            Self::StorageChanged(key) => is_watched_key(key.as_deref()),
            _ => true,
        }
    }
}

/// Resolves credentials from a storage snapshot and composes the URL.
///
/// Pure with respect to its inputs: unchanged storage and config give an
/// identical state.
pub fn run_pipeline(config: &SyncConfig, resolver: &CredentialResolver<'_>) -> SyncState {
    let resolution = match resolver.resolve() {
        Ok(resolution) => resolution,
        Err(e) => {
            warn!("auth check failed: {}", e);
            return SyncState::failed(e.into());
        }
    };
    if let Some(advisory) = &resolution.advisory {
        warn!("{}", advisory);
    }

    match compose(config, resolution.credentials.as_ref()) {
        Ok(url) => {
            debug!(
                "composed {} dtrader url",
                if url.is_authenticated() { "authenticated" } else { "anonymous" }
            );
            SyncState::ready(url, resolution.advisory)
        }
        Err(e) => {
            warn!("{}", e);
            SyncState::failed(e)
        }
    }
}

/// Owns the current [`SyncState`] and re-derives it on each relevant trigger.
///
/// Every run publishes `Loading` and then the result. Runs are synchronous,
/// so they never overlap; the last one wins.
pub struct ChangeWatcher {
    config: SyncConfig,
    primary: Rc<dyn KeyValueStore>,
    per_tab: Rc<dyn KeyValueStore>,
    state: SyncState,
    liveness: Option<Liveness>,
}

impl ChangeWatcher {
    pub fn new(
        config: SyncConfig,
        primary: Rc<dyn KeyValueStore>,
        per_tab: Rc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            config,
            primary,
            per_tab,
            state: SyncState::loading(),
            liveness: None,
        }
    }

    /// Ties the watcher to a mount scope; once it ends, triggers are ignored
    /// and nothing more is published.
    pub fn with_liveness(mut self, liveness: Liveness) -> Self {
        self.liveness = Some(liveness);
        self
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn is_live(&self) -> bool {
        self.liveness.as_ref().map_or(true, Liveness::is_live)
    }

    /// Handles one trigger. Returns `true` if the pipeline ran.
    pub fn handle(&mut self, trigger: &Trigger, publish: &mut impl FnMut(&SyncState)) -> bool {
        if !self.is_live() {
            trace!("ignoring {:?} after teardown", trigger);
            return false;
        }
        if !trigger.is_relevant() {
            trace!("ignoring {:?}", trigger);
            return false;
        }
        debug!("re-checking session on {:?}", trigger);

        self.state = SyncState::loading();
        publish(&self.state);

        let resolver = CredentialResolver::new(self.primary.as_ref(), self.per_tab.as_ref());
        let next = run_pipeline(&self.config, &resolver);

        // The run may have outlived the mount scope.
        if !self.is_live() {
            return false;
        }
        self.state = next;
        publish(&self.state);
        true
    }
}
