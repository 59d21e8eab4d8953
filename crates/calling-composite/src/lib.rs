//! Calling composite state layer
//!
//! Everything the calling UI shows is derived from one `AppState` owned by a
//! `composite_store::Store`. Views and platform callbacks only ever dispatch
//! actions:
//!
//! ```text
//! view model intent ─┐
//! SDK event ─────────┼─► Store ─► middleware (side effects) ─► reducers ─► AppState ─► listeners
//! focus change ──────┘
//! ```
//!
//! The calling SDK, audio focus and audio routing are injected through the
//! traits in [`platform`].

pub mod accessibility;
pub mod actions;
pub mod composite;
pub mod domain_models;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod platform;
pub mod reducers;
pub mod sdk_events;
pub mod state;
pub mod view_models;

pub use actions::Action;
pub use composite::{CallComposite, CallCompositeBuilder};
pub use errors::{CompositeError, ErrorCode};
pub use handlers::CompositeEventHandlers;
pub use state::AppState;
