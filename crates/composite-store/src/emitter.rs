//! Snapshot emission strategies
//!
//! Reduction and notification are decoupled: the reduce side only hands the
//! committed snapshot to the emitter. Depending on the strategy, listeners
//! are called on the reducing thread, on a dedicated notifier thread, or on
//! the notifier thread after a quiescence window (debounce).

use crate::error::StoreError;
use crate::listener::Listeners;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How published snapshots reach listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emission {
    /// Notify synchronously on the thread that committed the snapshot
    #[default]
    Inline,
    /// Hand snapshots to a dedicated notifier thread
    Worker,
    /// Like `Worker`, but coalesce bursts: only the latest snapshot is
    /// delivered once no new snapshot arrived for the given window
    Debounced(Duration),
}

struct Published<S> {
    version: u64,
    state: Arc<S>,
}

pub(crate) enum Emitter<S> {
    Inline,
    Worker {
        tx: Mutex<Option<Sender<Published<S>>>>,
        handle: Mutex<Option<JoinHandle<()>>>,
    },
}

impl<S: Send + Sync + 'static> Emitter<S> {
    pub(crate) fn spawn(
        emission: Emission,
        listeners: Arc<Listeners<S>>,
        ended: Arc<AtomicBool>,
    ) -> Result<Self, StoreError> {
        let window = match emission {
            Emission::Inline => return Ok(Emitter::Inline),
            Emission::Worker => None,
            Emission::Debounced(window) => Some(window),
        };

        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("composite-notifier".to_string())
            .spawn(move || notifier_loop(rx, listeners, ended, window))
            .map_err(|e| StoreError::WorkerSpawn {
                name: "composite-notifier",
                reason: e.to_string(),
            })?;

        Ok(Emitter::Worker {
            tx: Mutex::new(Some(tx)),
            handle: Mutex::new(Some(handle)),
        })
    }
}

impl<S> Emitter<S> {
    pub(crate) fn publish(&self, version: u64, state: Arc<S>, listeners: &Listeners<S>) {
        match self {
            Emitter::Inline => listeners.notify(version, &state),
            Emitter::Worker { tx, .. } => {
                let tx = tx.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(tx) = tx.as_ref() {
                    if tx.send(Published { version, state }).is_err() {
                        log::error!("Notifier channel disconnected, dropping version {}", version);
                    }
                }
            }
        }
    }

    /// Stop the notifier thread; pending (debounced) snapshots are dropped
    pub(crate) fn shutdown(&self) {
        if let Emitter::Worker { tx, handle } = self {
            tx.lock().unwrap_or_else(PoisonError::into_inner).take();
            let handle = handle.lock().unwrap_or_else(PoisonError::into_inner).take();
            if let Some(handle) = handle {
                if handle.thread().id() == thread::current().id() {
                    // Ended from inside a listener; the loop exits on its own
                    return;
                }
                if handle.join().is_err() {
                    log::error!("Notifier thread panicked");
                }
            }
        }
    }
}

fn notifier_loop<S>(
    rx: Receiver<Published<S>>,
    listeners: Arc<Listeners<S>>,
    ended: Arc<AtomicBool>,
    window: Option<Duration>,
) {
    log::info!("State notifier started (debounce: {:?})", window);

    while let Ok(mut latest) = rx.recv() {
        if let Some(window) = window {
            loop {
                match rx.recv_timeout(window) {
                    Ok(newer) => latest = newer,
                    Err(RecvTimeoutError::Timeout) => break,
                    Err(RecvTimeoutError::Disconnected) => {
                        log::info!("State notifier stopped");
                        return;
                    }
                }
            }
        }

        if ended.load(Ordering::Acquire) {
            break;
        }
        listeners.notify(latest.version, &latest.state);
    }

    log::info!("State notifier stopped");
}
