//=============================================================================
// File: src/hooks/use_session_sync.rs
//=============================================================================
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_logger::tracing::warn;
use futures::Stream;
use futures::StreamExt;
use futures_channel::mpsc::UnboundedSender;
use session::ChangeWatcher;
use session::KeyValueStore;
use session::Liveness;
use session::StorageError;
use session::SyncConfig;
use session::SyncState;
use session::Teardown;
use session::Trigger;

use crate::compat;

/// The persistent store and the per-tab store, in that order.
pub type Stores = (Rc<dyn KeyValueStore>, Rc<dyn KeyValueStore>);

/// Where the hook gets its storage and change notifications from.
#[derive(Clone, Copy)]
pub struct SessionEnv {
    pub open_stores: fn() -> Result<Stores, StorageError>,
    /// Subscribes to cross-tab storage changes. The returned guard is held
    /// until unmount.
    pub subscribe: fn(UnboundedSender<Trigger>) -> Result<Box<dyn Any>, StorageError>,
}

impl SessionEnv {
    pub fn browser() -> Self {
        Self {
            open_stores: compat::browser_stores,
            subscribe: |tx| {
                compat::StorageListener::subscribe(tx).map(|l| Box::new(l) as Box<dyn Any>)
            },
        }
    }
}

/// Handle returned by [`use_session_sync`].
#[derive(Clone, Copy)]
pub struct SessionSync {
    state: Signal<SyncState>,
    triggers: Coroutine<Trigger>,
}

impl SessionSync {
    /// The current state. Call `.read()` on this in a component to subscribe.
    pub fn state(&self) -> Signal<SyncState> {
        self.state
    }

    /// Re-runs the pipeline now, e.g. from the error surface's retry button.
    /// If browser storage could not be opened, opening it is retried first.
    pub fn retry(&self) {
        self.triggers.send(Trigger::Retry);
    }
}

/// Keeps a [`SyncState`] in step with the login stored by the host page.
///
/// On mount this subscribes to cross-tab `storage` events, opens browser
/// storage and starts the re-check timer, then runs the pipeline. All of it
/// is released when the calling component unmounts, after which no further
/// state is written.
pub fn use_session_sync(config: SyncConfig) -> SessionSync {
    use_session_sync_with(config, SessionEnv::browser())
}

pub fn use_session_sync_with(config: SyncConfig, env: SessionEnv) -> SessionSync {
    let mut state = use_signal(SyncState::loading);
    let teardown = use_hook(|| Rc::new(RefCell::new(Some(Teardown::new()))));

    let triggers = use_coroutine({
        let teardown = teardown.clone();
        move |requests: UnboundedReceiver<Trigger>| {
            let config = config.clone();
            let teardown = teardown.clone();
            async move {
                // Unmounted before the coroutine got to run.
                let Some(liveness) = teardown.borrow().as_ref().map(Teardown::liveness) else {
                    return;
                };

                let (storage_tx, storage_rx) = futures_channel::mpsc::unbounded();
                match (env.subscribe)(storage_tx) {
                    Ok(listener) => {
                        if let Some(teardown) = teardown.borrow_mut().as_mut() {
                            teardown.hold("storage listener", listener);
                        }
                    }
                    Err(e) => warn!("no cross-tab storage events, relying on polling: {}", e),
                }
                let mut triggers = futures::stream::select(requests, storage_rx);

                let mut publish = move |s: &SyncState| state.set(s.clone());
                let Some((primary, per_tab)) =
                    open_stores(env, &liveness, &mut triggers, &mut publish).await
                else {
                    return;
                };

                let ticker = compat::interval::Interval::new(config.poll_interval());
                let mut watcher =
                    ChangeWatcher::new(config, primary, per_tab).with_liveness(liveness);
                session::drive(&mut watcher, triggers, ticker, publish).await;
            }
        }
    });

    use_drop(move || {
        if let Some(teardown) = teardown.borrow_mut().take() {
            teardown.release();
        }
    });

    SessionSync { state, triggers }
}

/// Opens the stores, publishing the failure and waiting for a relevant
/// trigger (normally a retry) before each further attempt.
///
/// Gives up with `None` once the triggers end or the mount scope is gone.
async fn open_stores<S>(
    env: SessionEnv,
    liveness: &Liveness,
    triggers: &mut S,
    mut publish: impl FnMut(&SyncState),
) -> Option<Stores>
where
    S: Stream<Item = Trigger> + Unpin,
{
    loop {
        let e = match (env.open_stores)() {
            Ok(stores) => return Some(stores),
            Err(e) => e,
        };
        warn!("cannot open browser storage: {}", e);
        if !liveness.is_live() {
            return None;
        }
        publish(&SyncState::failed(e.into()));

        loop {
            match triggers.next().await {
                None => return None,
                Some(trigger) if trigger.is_relevant() => break,
                Some(_) => {}
            }
        }
        if !liveness.is_live() {
            return None;
        }
        publish(&SyncState::loading());
    }
}
