//! Host event handlers
//!
//! The host application subscribes to a handful of coarse events instead of
//! raw state. A `HostEventListener` turns consecutive snapshots into those
//! events. With debounced emission intermediate snapshots may be skipped,
//! so events describe the net change between two delivered snapshots.

use crate::domain_models::{CallStatus, RemoteParticipant};
use crate::errors::CompositeError;
use crate::state::{AppState, Screen};
use composite_store::Listener;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type Handler<T> = Box<dyn Fn(T) + Send + Sync>;

/// Callbacks registered by the host application
#[derive(Default)]
pub struct CompositeEventHandlers {
    on_error: Vec<Handler<CompositeError>>,
    on_call_state_changed: Vec<Handler<CallStatus>>,
    on_participants_joined: Vec<Handler<Vec<RemoteParticipant>>>,
    on_participants_left: Vec<Handler<Vec<RemoteParticipant>>>,
    on_exit: Vec<Handler<()>>,
}

impl CompositeEventHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_error(mut self, handler: impl Fn(CompositeError) + Send + Sync + 'static) -> Self {
        self.on_error.push(Box::new(handler));
        self
    }

    pub fn on_call_state_changed(
        mut self,
        handler: impl Fn(CallStatus) + Send + Sync + 'static,
    ) -> Self {
        self.on_call_state_changed.push(Box::new(handler));
        self
    }

    pub fn on_remote_participant_joined(
        mut self,
        handler: impl Fn(Vec<RemoteParticipant>) + Send + Sync + 'static,
    ) -> Self {
        self.on_participants_joined.push(Box::new(handler));
        self
    }

    pub fn on_remote_participant_left(
        mut self,
        handler: impl Fn(Vec<RemoteParticipant>) + Send + Sync + 'static,
    ) -> Self {
        self.on_participants_left.push(Box::new(handler));
        self
    }

    pub fn on_exit(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_exit.push(Box::new(move |()| handler()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.on_error.is_empty()
            && self.on_call_state_changed.is_empty()
            && self.on_participants_joined.is_empty()
            && self.on_participants_left.is_empty()
            && self.on_exit.is_empty()
    }
}

/// Host callbacks must not take the notifier down
fn invoke<T: Clone>(event: &'static str, handlers: &[Handler<T>], value: T) {
    for handler in handlers {
        let value = value.clone();
        if catch_unwind(AssertUnwindSafe(|| handler(value))).is_err() {
            log::error!("Host handler for {} panicked", event);
        }
    }
}

/// Listener diffing consecutive snapshots into host events
pub struct HostEventListener {
    handlers: CompositeEventHandlers,
    previous: Mutex<Arc<AppState>>,
    exited: AtomicBool,
    closed: AtomicBool,
}

impl HostEventListener {
    /// `current` is the snapshot the host has already seen
    pub fn new(handlers: CompositeEventHandlers, current: Arc<AppState>) -> Self {
        Self {
            handlers,
            previous: Mutex::new(current),
            exited: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }

    /// Stop observing the session
    ///
    /// A host that has not seen the exit yet gets it now; `on_exit` fires at
    /// most once per listener.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.exit();
    }

    fn exit(&self) {
        if !self.exited.swap(true, Ordering::SeqCst) {
            invoke("exit", &self.handlers.on_exit, ());
        }
    }

    fn emit(&self, previous: &AppState, next: &AppState) {
        for error in new_errors(previous, next) {
            invoke("error", &self.handlers.on_error, error);
        }

        if previous.call.status != next.call.status {
            invoke(
                "call state",
                &self.handlers.on_call_state_changed,
                next.call.status,
            );
        }

        if previous.participants.roster_version != next.participants.roster_version {
            let joined: Vec<RemoteParticipant> = next
                .participants
                .participants
                .values()
                .filter(|p| !previous.participants.participants.contains_key(&p.id))
                .cloned()
                .collect();
            let left: Vec<RemoteParticipant> = previous
                .participants
                .participants
                .values()
                .filter(|p| !next.participants.participants.contains_key(&p.id))
                .cloned()
                .collect();
            if !joined.is_empty() {
                invoke("participants joined", &self.handlers.on_participants_joined, joined);
            }
            if !left.is_empty() {
                invoke("participants left", &self.handlers.on_participants_left, left);
            }
        }

        if previous.navigation.screen != Screen::Exit && next.navigation.screen == Screen::Exit {
            self.exit();
        }
    }
}

fn new_errors(previous: &AppState, next: &AppState) -> Vec<CompositeError> {
    let (before, after) = (&previous.errors, &next.errors);
    let mut errors = Vec::new();
    if after.fatal != before.fatal {
        errors.extend(after.fatal.clone());
    }
    if after.call_state_error != before.call_state_error && after.call_state_error != after.fatal {
        errors.extend(after.call_state_error.clone());
    }
    if after.notice != before.notice {
        errors.extend(after.notice.as_ref().map(|notice| notice.error.clone()));
    }
    errors
}

impl Listener<AppState> for HostEventListener {
    fn on_state_changed(&self, state: Arc<AppState>) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        let previous = {
            let mut previous = self.previous.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *previous, Arc::clone(&state))
        };
        self.emit(&previous, &state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Action, CallingAction, ErrorAction, ParticipantAction};
    use crate::errors::ErrorCode;
    use crate::reducers::app_reducer::reduce;
    use pretty_assertions::assert_eq;

    fn step(state: &Arc<AppState>, action: Action) -> Arc<AppState> {
        Arc::new(reduce(state.as_ref().clone(), &action))
    }

    #[test]
    fn test_diffs_into_host_events() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (a, b, c, d) = (log.clone(), log.clone(), log.clone(), log.clone());
        let handlers = CompositeEventHandlers::new()
            .on_call_state_changed(move |status| a.lock().unwrap().push(format!("state {}", status)))
            .on_remote_participant_joined(move |joined| {
                b.lock().unwrap().push(format!("joined {}", joined.len()))
            })
            .on_error(move |error| c.lock().unwrap().push(format!("error {}", error.code)))
            .on_exit(move || d.lock().unwrap().push("exit".to_string()));

        let initial = Arc::new(AppState::default());
        let listener = HostEventListener::new(handlers, Arc::clone(&initial));

        let connected = step(
            &initial,
            Action::Calling(CallingAction::StateUpdated {
                status: CallStatus::Connected,
                end_reason: None,
            }),
        );
        listener.on_state_changed(Arc::clone(&connected));

        let joined = step(
            &connected,
            Action::Participants(ParticipantAction::ParticipantsUpdated(vec![
                RemoteParticipant::new("a", "Alice"),
                RemoteParticipant::new("b", "Bob"),
            ])),
        );
        listener.on_state_changed(Arc::clone(&joined));

        let expired = step(
            &joined,
            Action::Error(ErrorAction::CallStateErrorOccurred(CompositeError::new(
                ErrorCode::TokenExpired,
                "expired",
            ))),
        );
        listener.on_state_changed(expired);

        assert_eq!(
            *log.lock().unwrap(),
            vec!["state Connected", "joined 2", "error token_expired", "exit"]
        );
    }

    #[test]
    fn test_panicking_handler_does_not_stop_others() {
        let called = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&called);
        let handlers = CompositeEventHandlers::new()
            .on_exit(|| panic!("host bug"))
            .on_exit(move || *flag.lock().unwrap() = true);
        let initial = Arc::new(AppState::default());
        let listener = HostEventListener::new(handlers, Arc::clone(&initial));

        listener.on_state_changed(step(&initial, Action::Error(ErrorAction::EmergencyExit)));

        assert!(*called.lock().unwrap());
    }

    #[test]
    fn test_close_delivers_exit_once() {
        let exits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&exits);
        let handlers = CompositeEventHandlers::new().on_exit(move || *counter.lock().unwrap() += 1);
        let initial = Arc::new(AppState::default());
        let listener = HostEventListener::new(handlers, Arc::clone(&initial));

        listener.close();
        listener.close();
        listener.on_state_changed(step(&initial, Action::Error(ErrorAction::EmergencyExit)));

        assert_eq!(*exits.lock().unwrap(), 1);
    }

    #[test]
    fn test_close_after_observed_exit_stays_quiet() {
        let exits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&exits);
        let handlers = CompositeEventHandlers::new().on_exit(move || *counter.lock().unwrap() += 1);
        let initial = Arc::new(AppState::default());
        let listener = HostEventListener::new(handlers, Arc::clone(&initial));

        listener.on_state_changed(step(&initial, Action::Error(ErrorAction::EmergencyExit)));
        listener.close();

        assert_eq!(*exits.lock().unwrap(), 1);
    }
}
