//! Dispatcher for middleware and platform callbacks
//!
//! When middleware (or a callback registered with some platform service)
//! needs to dispatch an action, it uses the Dispatcher. Actions dispatched
//! this way re-enter the middleware chain from the beginning, serialized with
//! every other dispatch, so off-thread callbacks never touch state directly.

use crate::state_cell::StateCell;
use crate::store::StoreInner;
use std::fmt;
use std::sync::{Arc, Weak};

/// Cloneable, thread-safe handle for sending actions into a store
///
/// The dispatcher only holds a weak reference: once the store is dropped,
/// dispatching becomes a logged no-op.
pub struct Dispatcher<S, A> {
    inner: Weak<StoreInner<S, A>>,
}

impl<S, A> Dispatcher<S, A> {
    pub(crate) fn new(inner: Weak<StoreInner<S, A>>) -> Self {
        Self { inner }
    }
}

impl<S, A> Clone for Dispatcher<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S, A> fmt::Debug for Dispatcher<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl<S, A> Dispatcher<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: fmt::Debug + Send + 'static,
{
    /// Dispatch an action to be processed through the middleware chain
    pub fn dispatch(&self, action: A) {
        match self.inner.upgrade() {
            Some(inner) => inner.dispatch(action),
            None => log::debug!("Store dropped, discarding {:?}", action),
        }
    }
}

/// The store as seen from inside the pipeline
///
/// Gives middleware read access to the latest committed state and a way to
/// dispatch follow-up actions. It never allows writing state directly.
pub struct StoreHandle<S, A> {
    cell: Arc<StateCell<S>>,
    dispatcher: Dispatcher<S, A>,
}

impl<S, A> StoreHandle<S, A> {
    pub(crate) fn new(cell: Arc<StateCell<S>>, dispatcher: Dispatcher<S, A>) -> Self {
        Self { cell, dispatcher }
    }

    pub(crate) fn cell(&self) -> &StateCell<S> {
        &self.cell
    }

    /// Latest committed state snapshot
    pub fn state(&self) -> Arc<S> {
        self.cell.current()
    }

    /// Get a dispatcher that can be moved into callbacks and tasks
    pub fn dispatcher(&self) -> Dispatcher<S, A> {
        self.dispatcher.clone()
    }

    pub fn is_ended(&self) -> bool {
        self.cell.is_ended()
    }
}

impl<S, A> Clone for StoreHandle<S, A> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<S, A> StoreHandle<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: fmt::Debug + Send + 'static,
{
    /// Dispatch a follow-up action; it re-enters the chain from the top after
    /// the action currently being processed
    pub fn dispatch(&self, action: A) {
        self.dispatcher.dispatch(action);
    }
}
