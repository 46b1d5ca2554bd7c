//! Async loop feeding triggers from every source into one [`ChangeWatcher`].

use std::future::Future;

use dioxus_logger::tracing::info;
use futures::Stream;
use futures::StreamExt;

use crate::state::SyncState;
use crate::watcher::ChangeWatcher;
use crate::watcher::Trigger;

/// A periodic timer. Implemented per platform (browser interval or tokio).
pub trait Ticker {
    /// Completes at the next tick. The first tick is one period after creation.
    ///
    /// Implementations may write `async fn tick(&mut self)`. The returned
    /// future is not required to be `Send`; browser timers are not.
    fn tick(&mut self) -> impl Future<Output = ()>;
}

/// Runs the watcher until the trigger stream ends or its mount scope is torn
/// down.
///
/// Runs once for [`Trigger::Mount`] up front, then once per item from
/// `triggers` (storage changes, retries) and once per `ticker` tick. Every
/// published state goes through `publish`.
pub async fn drive<S, T, F>(watcher: &mut ChangeWatcher, mut triggers: S, mut ticker: T, mut publish: F)
where
    S: Stream<Item = Trigger> + Unpin,
    T: Ticker,
    F: FnMut(&SyncState),
{
    info!(
        "session watcher started, re-checking every {}s",
        watcher.config().poll_secs
    );
    watcher.handle(&Trigger::Mount, &mut publish);

    while watcher.is_live() {
        let trigger = tokio::select! {
            biased;
            next = triggers.next() => match next {
                Some(trigger) => trigger,
                None => break,
            },
            () = ticker.tick() => Trigger::Tick,
        };
        watcher.handle(&trigger, &mut publish);
    }

    info!("session watcher stopped");
}
