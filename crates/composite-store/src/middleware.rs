//! Middleware system
//!
//! Middleware sits between action dispatch and reducer execution, allowing
//! side effects, async operations, logging, and other cross-cutting concerns
//! to be handled in a composable way.
//!
//! ```text
//! Action → Middleware[0] → Middleware[1] → … → Reducer → State
//! ```
//!
//! Each middleware receives a `Next` handle for the rest of the chain and can:
//! - forward the action (`next.run(action)`)
//! - forward a substitute, or additional actions (call `next.run` again)
//! - swallow the action (never call `next.run`)
//! - dispatch follow-up actions that re-enter from the top (`store.dispatch`)

use crate::dispatcher::StoreHandle;
use crate::reducer::Reducer;
use std::fmt::Debug;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Middleware trait - intercepts actions before they reach the reducer
///
/// In threaded mode middleware runs on the store's reduce thread, so any
/// private bookkeeping it keeps is only ever touched from that thread. Work
/// that has to wait for a platform service must be spawned elsewhere and
/// report back by dispatching an action.
pub trait Middleware<S, A>: Send {
    /// Called once when the store is built, before the first action
    ///
    /// Use this to register out-of-band platform callbacks that dispatch
    /// through `store.dispatcher()`.
    fn attach(&mut self, _store: &StoreHandle<S, A>) {}

    /// Handle an action
    ///
    /// - `action`: the action to process
    /// - `store`: read-only view of the latest state plus a dispatcher
    /// - `next`: the remaining chain, ending in the reducer
    fn handle(&mut self, action: A, store: &StoreHandle<S, A>, next: &mut Next<'_, S, A>);
}

/// The remaining middleware chain, terminated by the reducer
pub struct Next<'a, S, A> {
    rest: &'a mut [Box<dyn Middleware<S, A>>],
    store: &'a StoreHandle<S, A>,
    terminal: &'a dyn Fn(A),
}

impl<S, A> Next<'_, S, A> {
    /// Pass an action to the next stage
    ///
    /// May be called several times; every call runs the full remaining chain.
    pub fn run(&mut self, action: A) {
        match self.rest.split_first_mut() {
            Some((head, tail)) => {
                let mut next = Next {
                    rest: tail,
                    store: self.store,
                    terminal: self.terminal,
                };
                head.handle(action, self.store, &mut next);
            }
            None => (self.terminal)(action),
        }
    }
}

/// Middleware chain plus terminal reducer, owned by whoever runs reductions
pub(crate) struct Pipeline<S, A> {
    middleware: Vec<Box<dyn Middleware<S, A>>>,
    reducer: Box<dyn Reducer<S, A>>,
    store: StoreHandle<S, A>,
}

impl<S: Clone, A: Debug> Pipeline<S, A> {
    pub(crate) fn new(
        middleware: Vec<Box<dyn Middleware<S, A>>>,
        reducer: Box<dyn Reducer<S, A>>,
        store: StoreHandle<S, A>,
    ) -> Self {
        Self {
            middleware,
            reducer,
            store,
        }
    }

    pub(crate) fn attach(&mut self) {
        for middleware in &mut self.middleware {
            middleware.attach(&self.store);
        }
    }

    /// Run one action through the chain; a panicking stage is logged and the
    /// action is abandoned without taking the reduce thread down
    pub(crate) fn run(&mut self, action: A) {
        let description = format!("{:?}", action);
        let store = &self.store;
        let reducer = self.reducer.as_ref();
        let terminal = |action: A| {
            let cell = store.cell();
            let current = cell.current();
            cell.commit(reducer.reduce(current.as_ref().clone(), &action));
        };
        let mut next = Next {
            rest: &mut self.middleware,
            store,
            terminal: &terminal,
        };
        if catch_unwind(AssertUnwindSafe(|| next.run(action))).is_err() {
            log::error!("Pipeline panicked while processing {}", description);
        }
    }

    pub(crate) fn clear(&mut self) {
        if !self.middleware.is_empty() {
            log::debug!("Clearing {} middleware", self.middleware.len());
        }
        self.middleware.clear();
    }
}

/// LoggingMiddleware - logs all actions passing through
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A: Debug> Middleware<S, A> for LoggingMiddleware {
    fn handle(&mut self, action: A, _store: &StoreHandle<S, A>, next: &mut Next<'_, S, A>) {
        log::debug!("Action: {:?}", action);
        next.run(action);
    }
}
