//! Scoped ownership of the watcher's timer and listener.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use dioxus_logger::tracing::debug;

/// Shared "still mounted" flag. Anything that publishes state checks it
/// first, so nothing is written after teardown.
#[derive(Clone, Debug)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Collects release actions for resources acquired while mounting and runs
/// them once, in reverse order of acquisition.
///
/// Releasing consumes the guard, so it cannot run twice. Dropping an
/// unreleased guard releases too, which covers early returns and `?` during
/// setup.
pub struct Teardown {
    live: Arc<AtomicBool>,
    releases: Vec<(&'static str, Box<dyn FnOnce()>)>,
}

impl Default for Teardown {
    fn default() -> Self {
        Self::new()
    }
}

impl Teardown {
    pub fn new() -> Self {
        Self {
            live: Arc::new(AtomicBool::new(true)),
            releases: Vec::new(),
        }
    }

    pub fn liveness(&self) -> Liveness {
        Liveness(self.live.clone())
    }

    /// Registers `release` to run at teardown. `name` is only used for logging.
    pub fn defer(&mut self, name: &'static str, release: impl FnOnce() + 'static) {
        self.releases.push((name, Box::new(release)));
    }

    /// Takes ownership of `resource` and drops it at teardown.
    pub fn hold<R: 'static>(&mut self, name: &'static str, resource: R) {
        self.defer(name, move || drop(resource));
    }

    pub fn release(mut self) {
        self.run();
    }

    fn run(&mut self) {
        self.live.store(false, Ordering::Release);
        while let Some((name, release)) = self.releases.pop() {
            debug!("releasing {}", name);
            release();
        }
    }
}

impl Drop for Teardown {
    fn drop(&mut self) {
        self.run();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn FnOnce()>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let make = {
            let log = log.clone();
            move |name: &'static str| -> Box<dyn FnOnce()> {
                let log = log.clone();
                Box::new(move || log.borrow_mut().push(name))
            }
        };
        (log, make)
    }

    #[test]
    fn releases_in_reverse_order_exactly_once() {
        let (log, make) = recorder();
        let mut teardown = Teardown::new();
        teardown.defer("timer", make("timer"));
        teardown.defer("listener", make("listener"));

        teardown.release();

        assert_eq!(*log.borrow(), vec!["listener", "timer"]);
    }

    #[test]
    fn release_clears_liveness() {
        let teardown = Teardown::new();
        let liveness = teardown.liveness();
        assert!(liveness.is_live());
        teardown.release();
        assert!(!liveness.is_live());
    }

    #[test]
    fn failed_setup_still_releases_acquired_resources() {
        let (log, make) = recorder();

        fn setup(make: &dyn Fn(&'static str) -> Box<dyn FnOnce()>) -> Result<Teardown, String> {
            let mut teardown = Teardown::new();
            teardown.defer("timer", make("timer"));
            Err::<(), _>("listener registration failed".to_string())?;
            teardown.defer("listener", make("listener"));
            Ok(teardown)
        }

        assert!(setup(&make).is_err());
        assert_eq!(*log.borrow(), vec!["timer"]);
    }

    #[test]
    fn held_resources_are_dropped() {
        struct Guard(Rc<RefCell<bool>>);
        impl Drop for Guard {
            fn drop(&mut self) {
                *self.0.borrow_mut() = true;
            }
        }

        let dropped = Rc::new(RefCell::new(false));
        let mut teardown = Teardown::new();
        teardown.hold("guard", Guard(dropped.clone()));
        assert!(!*dropped.borrow());
        drop(teardown);
        assert!(*dropped.borrow());
    }
}
