use crate::accessibility::Announcer;
use crate::actions::Action;
use crate::reducers::{
    audio_reducer, audio_session_reducer, call_reducer, error_reducer, lifecycle_reducer,
    local_user_reducer, navigation_reducer, participants_reducer, permission_reducer,
};
use crate::state::AppState;

/// Reducer - pure function that produces new state from current state + action
///
/// This is the root reducer: every action goes through every sub-reducer,
/// each owning exactly one field of `AppState`.
pub fn reduce(state: AppState, action: &Action) -> AppState {
    AppState {
        call: call_reducer::reduce(state.call, action),
        participants: participants_reducer::reduce(state.participants, action),
        local_user: local_user_reducer::reduce(state.local_user, action),
        permissions: permission_reducer::reduce(state.permissions, action),
        audio: audio_reducer::reduce(state.audio, action),
        audio_session: audio_session_reducer::reduce(state.audio_session, action),
        errors: error_reducer::reduce(state.errors, action),
        navigation: navigation_reducer::reduce(state.navigation, action),
        lifecycle: lifecycle_reducer::reduce(state.lifecycle, action),
    }
}

/// Root reducer plugged into the store
///
/// The optional announcer observes each transition after it is computed and
/// never changes the resulting state.
#[derive(Default)]
pub struct AppStateReducer {
    announcer: Option<Box<dyn Announcer>>,
}

impl AppStateReducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_announcer(announcer: Box<dyn Announcer>) -> Self {
        Self {
            announcer: Some(announcer),
        }
    }
}

impl composite_store::Reducer<AppState, Action> for AppStateReducer {
    fn reduce(&self, state: AppState, action: &Action) -> AppState {
        let Some(announcer) = &self.announcer else {
            return reduce(state, action);
        };

        let previous = state.clone();
        let next = reduce(state, action);
        announcer.announce(&previous, &next, action);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{CallingAction, LocalUserAction};
    use crate::domain_models::CallStatus;
    use crate::state::MicOperation;
    use composite_store::Reducer;
    use std::sync::{Arc, Mutex};

    struct RecordingAnnouncer(Arc<Mutex<usize>>);

    impl Announcer for RecordingAnnouncer {
        fn announce(&self, _previous: &AppState, _next: &AppState, _action: &Action) {
            *self.0.lock().unwrap() += 1;
        }
    }

    #[test]
    fn test_fans_out_to_every_sub_state() {
        let state = reduce(
            AppState::for_user("Ada"),
            &Action::Calling(CallingAction::CallStartRequested),
        );
        let state = reduce(
            state,
            &Action::Calling(CallingAction::StateUpdated {
                status: CallStatus::Connected,
                end_reason: None,
            }),
        );
        let state = reduce(state, &Action::LocalUser(LocalUserAction::MicOnSucceeded));

        assert_eq!(state.call.status, CallStatus::Connected);
        assert_eq!(state.navigation.screen, crate::state::Screen::Call);
        assert_eq!(state.local_user.mic, MicOperation::On);
        assert_eq!(state.local_user.display_name, "Ada");
    }

    #[test]
    fn test_announcer_sees_every_transition_without_changing_it() {
        let count = Arc::new(Mutex::new(0));
        let reducer = AppStateReducer::with_announcer(Box::new(RecordingAnnouncer(Arc::clone(
            &count,
        ))));
        let action = Action::LocalUser(LocalUserAction::MicOnSucceeded);

        let with_announcer = reducer.reduce(AppState::default(), &action);
        let plain = reduce(AppState::default(), &action);

        assert_eq!(with_announcer, plain);
        assert_eq!(*count.lock().unwrap(), 1);
    }
}
