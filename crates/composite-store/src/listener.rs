//! State change listeners
//!
//! Listeners are registered together with the snapshot version current at
//! registration time. A listener only ever receives snapshots with a greater
//! version, so one registered mid-session never sees state it predates.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};

/// Callback invoked with every published state snapshot
///
/// Implemented for any `Fn(Arc<S>) + Send + Sync` closure.
pub trait Listener<S>: Send + Sync {
    fn on_state_changed(&self, state: Arc<S>);
}

impl<S, F> Listener<S> for F
where
    F: Fn(Arc<S>) + Send + Sync,
{
    fn on_state_changed(&self, state: Arc<S>) {
        self(state)
    }
}

/// Forwards snapshots into a channel (backs `Store::watch`)
pub(crate) struct ChannelListener<S> {
    tx: Sender<Arc<S>>,
}

impl<S> ChannelListener<S> {
    pub(crate) fn new(tx: Sender<Arc<S>>) -> Self {
        Self { tx }
    }
}

impl<S: Send + Sync> Listener<S> for ChannelListener<S> {
    fn on_state_changed(&self, state: Arc<S>) {
        // A dropped receiver just means nobody is watching anymore
        let _ = self.tx.send(state);
    }
}

/// Handle returned by `Store::add_listener`, used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registration<S> {
    id: ListenerId,
    since: u64,
    listener: Arc<dyn Listener<S>>,
}

/// Registry of listeners shared between the store and its notifier
pub(crate) struct Listeners<S> {
    next_id: AtomicU64,
    entries: Mutex<Vec<Registration<S>>>,
}

impl<S> Listeners<S> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn add(&self, listener: Arc<dyn Listener<S>>, since: u64) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Registration {
                id,
                since,
                listener,
            });
        log::debug!("Listener {:?} registered at version {}", id, since);
        id
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }

    pub(crate) fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Deliver a snapshot to every listener registered before `version`
    ///
    /// The registry lock is released before any callback runs, so listeners
    /// may add or remove listeners (or dispatch) from inside the callback.
    pub(crate) fn notify(&self, version: u64, state: &Arc<S>) {
        let targets: Vec<(ListenerId, Arc<dyn Listener<S>>)> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|entry| entry.since < version)
            .map(|entry| (entry.id, Arc::clone(&entry.listener)))
            .collect();

        for (id, listener) in targets {
            let state = Arc::clone(state);
            let delivered = catch_unwind(AssertUnwindSafe(|| listener.on_state_changed(state)));
            if delivered.is_err() {
                log::error!("Listener {:?} panicked while handling version {}", id, version);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(log: &Arc<Mutex<Vec<u32>>>) -> Arc<dyn Listener<u32>> {
        let log = Arc::clone(log);
        Arc::new(move |state: Arc<u32>| log.lock().unwrap().push(*state))
    }

    #[test]
    fn test_listener_only_sees_newer_versions() {
        let listeners = Listeners::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        listeners.add(recording(&log), 3);

        listeners.notify(3, &Arc::new(30));
        listeners.notify(4, &Arc::new(40));

        assert_eq!(*log.lock().unwrap(), vec![40]);
    }

    #[test]
    fn test_removed_listener_is_not_notified() {
        let listeners = Listeners::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let id = listeners.add(recording(&log), 0);

        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));
        listeners.notify(1, &Arc::new(1));

        assert!(log.lock().unwrap().is_empty());
    }

    fn failing_host_callback(_: Arc<u32>) {
        panic!("host callback failed");
    }

    #[test]
    fn test_panicking_listener_does_not_stop_delivery() {
        let listeners = Listeners::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        listeners.add(Arc::new(failing_host_callback), 0);
        listeners.add(recording(&log), 0);

        listeners.notify(1, &Arc::new(7));

        assert_eq!(*log.lock().unwrap(), vec![7]);
    }
}
