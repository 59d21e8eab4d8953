//! Calling middleware
//!
//! Every side effect of the composite lives in one of these. They run in
//! this order:
//!
//! ```text
//! Logging → Error → AudioFocus → AudioDevice → CallAction → AppStateReducer
//! ```

use crate::actions::Action;
use crate::state::AppState;
use composite_store::{Next, StoreHandle};

pub mod audio_device_middleware;
pub mod audio_focus_middleware;
pub mod call_action_middleware;
pub mod error_middleware;

pub use audio_device_middleware::AudioDeviceMiddleware;
pub use audio_focus_middleware::AudioFocusMiddleware;
pub use call_action_middleware::CallActionMiddleware;
pub use error_middleware::ErrorMiddleware;

/// The store as seen by calling middleware
pub type AppStore = StoreHandle<AppState, Action>;

/// Rest of the calling middleware chain
pub type AppNext<'a> = Next<'a, AppState, Action>;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::actions::Action;
    use crate::reducers::AppStateReducer;
    use crate::state::AppState;
    use composite_store::{DispatchMode, Emission, Middleware, Store};
    use std::thread;
    use std::time::{Duration, Instant};

    /// Immediate-mode store with inline emission around the given chain
    pub fn store_with(middleware: Vec<Box<dyn Middleware<AppState, Action>>>) -> Store<AppState, Action> {
        store_from(AppState::for_user("Ada"), middleware)
    }

    pub fn store_from(
        initial: AppState,
        middleware: Vec<Box<dyn Middleware<AppState, Action>>>,
    ) -> Store<AppState, Action> {
        middleware
            .into_iter()
            .fold(
                Store::builder(initial, AppStateReducer::new())
                    .mode(DispatchMode::Immediate)
                    .emission(Emission::Inline),
                |builder, middleware| builder.boxed_middleware(middleware),
            )
            .build()
            .unwrap()
    }

    /// Poll until the predicate holds on the current state
    pub fn wait_until(store: &Store<AppState, Action>, predicate: impl Fn(&AppState) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !predicate(&store.current_state()) {
            assert!(
                Instant::now() < deadline,
                "condition not reached, state: {:#?}",
                store.current_state()
            );
            thread::sleep(Duration::from_millis(2));
        }
    }

    /// Records every action reaching the end of the chain
    pub struct Recorder(pub std::sync::Arc<std::sync::Mutex<Vec<Action>>>);

    impl Middleware<AppState, Action> for Recorder {
        fn handle(&mut self, action: Action, _store: &super::AppStore, next: &mut super::AppNext<'_>) {
            self.0.lock().unwrap().push(action.clone());
            next.run(action);
        }
    }
}
