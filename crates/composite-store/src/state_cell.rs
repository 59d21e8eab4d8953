use crate::emitter::Emitter;
use crate::listener::Listeners;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A committed state together with its position in the reduction sequence
pub(crate) struct Snapshot<S> {
    pub(crate) version: u64,
    pub(crate) state: Arc<S>,
}

/// Owner of the current snapshot
///
/// Only the pipeline owner commits (single writer); everyone else reads the
/// latest snapshot lock-free.
pub(crate) struct StateCell<S> {
    snapshot: ArcSwap<Snapshot<S>>,
    ended: Arc<AtomicBool>,
    listeners: Arc<Listeners<S>>,
    emitter: Emitter<S>,
}

impl<S> StateCell<S> {
    pub(crate) fn new(
        initial: S,
        ended: Arc<AtomicBool>,
        listeners: Arc<Listeners<S>>,
        emitter: Emitter<S>,
    ) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(Snapshot {
                version: 0,
                state: Arc::new(initial),
            }),
            ended,
            listeners,
            emitter,
        }
    }

    pub(crate) fn current(&self) -> Arc<S> {
        Arc::clone(&self.snapshot.load().state)
    }

    pub(crate) fn version(&self) -> u64 {
        self.snapshot.load().version
    }

    pub(crate) fn listeners(&self) -> &Listeners<S> {
        &self.listeners
    }

    pub(crate) fn is_ended(&self) -> bool {
        self.ended.load(Ordering::Acquire)
    }

    /// Flag the cell as ended; returns false if it already was
    pub(crate) fn mark_ended(&self) -> bool {
        !self.ended.swap(true, Ordering::AcqRel)
    }

    /// Replace the whole snapshot and publish it
    pub(crate) fn commit(&self, next: S) {
        if self.is_ended() {
            log::debug!("Store ended, discarding reduced state");
            return;
        }

        let version = self.version() + 1;
        let state = Arc::new(next);
        self.snapshot.store(Arc::new(Snapshot {
            version,
            state: Arc::clone(&state),
        }));
        self.emitter.publish(version, state, &self.listeners);
    }

    pub(crate) fn shutdown(&self) {
        self.emitter.shutdown();
        self.listeners.clear();
    }
}
