//! Platform glue for the session watcher: storage access, cross-tab change
//! notifications, and the re-check timer.

// Re-export the public API from the appropriate module
#[cfg(target_arch = "wasm32")]
pub use wasm32::*;

#[cfg(not(target_arch = "wasm32"))]
pub use non_wasm32::*;

#[cfg(target_arch = "wasm32")]
pub mod wasm32 {
    use std::rc::Rc;

    use dioxus_logger::tracing::warn;
    use futures_channel::mpsc::UnboundedSender;
    use session::KeyValueStore;
    use session::MemoryStore;
    use session::StorageError;
    use session::Trigger;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::Storage;
    use web_sys::StorageEvent;
    use web_sys::Window;

    pub mod interval {
        use futures::StreamExt;
        use futures_channel::mpsc;
        use std::time::Duration;

        /// Browser interval; the underlying timer is cleared on drop.
        pub struct Interval {
            inner: Option<gloo_timers::callback::Interval>,
            rx: mpsc::UnboundedReceiver<()>,
        }

        impl Interval {
            pub fn new(duration: Duration) -> Self {
                let (tx, rx) = mpsc::unbounded();
                let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
                let gloo_interval = gloo_timers::callback::Interval::new(millis, move || {
                    let _ = tx.unbounded_send(());
                });

                Self {
                    inner: Some(gloo_interval),
                    rx,
                }
            }
        }

        impl session::Ticker for Interval {
            async fn tick(&mut self) {
                if self.rx.next().await.is_none() {
                    // timer cancelled; never tick again
                    futures::future::pending::<()>().await;
                }
            }
        }

        impl Drop for Interval {
            fn drop(&mut self) {
                if let Some(inner) = self.inner.take() {
                    inner.cancel();
                }
            }
        }
    }

    fn js_error(e: &JsValue) -> String {
        e.as_string().unwrap_or_else(|| format!("{e:?}"))
    }

    /// `localStorage` or `sessionStorage` as a [`KeyValueStore`].
    pub struct BrowserStorage {
        storage: Storage,
    }

    impl KeyValueStore for BrowserStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.storage
                .get_item(key)
                .map_err(|e| StorageError::Read {
                    key: key.to_string(),
                    reason: js_error(&e),
                })
        }
    }

    fn window() -> Result<Window, StorageError> {
        web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))
    }

    fn open(
        name: &str,
        storage: Result<Option<Storage>, JsValue>,
    ) -> Result<BrowserStorage, StorageError> {
        match storage {
            Ok(Some(storage)) => Ok(BrowserStorage { storage }),
            Ok(None) => Err(StorageError::Unavailable(format!("{name} is not available"))),
            Err(e) => Err(StorageError::Unavailable(format!("{name}: {}", js_error(&e)))),
        }
    }

    /// The persistent store and the per-tab store, in that order.
    ///
    /// `localStorage` is required. Without `sessionStorage` the per-tab
    /// fallback for the login id is simply empty.
    pub fn browser_stores() -> Result<(Rc<dyn KeyValueStore>, Rc<dyn KeyValueStore>), StorageError>
    {
        let window = window()?;
        let local = open("localStorage", window.local_storage())?;
        let per_tab: Rc<dyn KeyValueStore> =
            match open("sessionStorage", window.session_storage()) {
                Ok(storage) => Rc::new(storage),
                Err(e) => {
                    warn!("{}, per-tab login fallback disabled", e);
                    Rc::new(MemoryStore::new())
                }
            };
        let local: Rc<dyn KeyValueStore> = Rc::new(local);
        Ok((local, per_tab))
    }

    /// A `storage` event subscription on `window`. The browser only fires it
    /// for writes made by other tabs. Removed on drop.
    pub struct StorageListener {
        window: Window,
        callback: Closure<dyn FnMut(StorageEvent)>,
    }

    impl StorageListener {
        pub fn subscribe(tx: UnboundedSender<Trigger>) -> Result<Self, StorageError> {
            let window = window()?;
            let callback = Closure::<dyn FnMut(StorageEvent)>::wrap(Box::new(
                move |event: StorageEvent| {
                    let _ = tx.unbounded_send(Trigger::StorageChanged(event.key()));
                },
            ));
            window
                .add_event_listener_with_callback("storage", callback.as_ref().unchecked_ref())
                .map_err(|e| StorageError::Unavailable(format!("storage events: {}", js_error(&e))))?;
            Ok(Self { window, callback })
        }
    }

    impl Drop for StorageListener {
        fn drop(&mut self) {
            let _ = self
                .window
                .remove_event_listener_with_callback("storage", self.callback.as_ref().unchecked_ref());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub mod non_wasm32 {
    use std::rc::Rc;

    use futures_channel::mpsc::UnboundedSender;
    use session::KeyValueStore;
    use session::MemoryStore;
    use session::StorageError;
    use session::Trigger;

    pub mod interval {
        use tokio::time::{self, Duration, Instant, MissedTickBehavior};

        pub struct Interval {
            inner: tokio::time::Interval,
        }

        impl Interval {
            pub fn new(duration: Duration) -> Self {
                // first tick one period out, matching the browser timer
                let mut interval = time::interval_at(Instant::now() + duration, duration);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                Self { inner: interval }
            }
        }

        impl session::Ticker for Interval {
            async fn tick(&mut self) {
                self.inner.tick().await;
            }
        }
    }

    /// Native builds only run the crate's tests, so both stores start out
    /// empty and live in memory.
    pub fn browser_stores() -> Result<(Rc<dyn KeyValueStore>, Rc<dyn KeyValueStore>), StorageError>
    {
        let local: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
        let per_tab: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
        Ok((local, per_tab))
    }

    /// There are no other tabs natively, so no change events ever arrive.
    pub struct StorageListener {
        _tx: UnboundedSender<Trigger>,
    }

    impl StorageListener {
        pub fn subscribe(tx: UnboundedSender<Trigger>) -> Result<Self, StorageError> {
            Ok(Self { _tx: tx })
        }
    }
}
