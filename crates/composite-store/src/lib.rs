//! Single-writer action store
//!
//! This crate provides the state container used by the composites:
//! - `Store` owns exactly one current state snapshot and serializes every mutation
//! - `Middleware` intercepts actions before they reach the reducer (side effects live here)
//! - `Reducer` is a pure function computing the next state from (state, action)
//! - Listeners observe published snapshots, inline, on a notifier worker, or debounced
//!
//! ```text
//! dispatch(action) → Middleware → … → Middleware → Reducer → commit → listeners
//!        ↑                  │
//!        └── Dispatcher ────┘  (follow-up actions re-enter from the top)
//! ```

mod dispatcher;
mod emitter;
mod error;
mod listener;
mod middleware;
mod reducer;
mod state_bag;
mod state_cell;
mod store;

pub use dispatcher::{Dispatcher, StoreHandle};
pub use emitter::Emission;
pub use error::StoreError;
pub use listener::{Listener, ListenerId};
pub use middleware::{LoggingMiddleware, Middleware, Next};
pub use reducer::Reducer;
pub use state_bag::StateBag;
pub use store::{DispatchMode, Store, StoreBuilder};
