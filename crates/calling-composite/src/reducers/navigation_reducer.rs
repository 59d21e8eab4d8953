//! Navigation Reducer
//!
//! `Exit` is terminal: once the session is torn down no action brings a
//! screen back.

use crate::actions::{Action, CallingAction, ErrorAction, NavigationAction};
use crate::state::{NavigationState, Screen};

pub fn reduce(mut state: NavigationState, action: &Action) -> NavigationState {
    if state.screen == Screen::Exit {
        return state;
    }

    match action {
        Action::Navigation(NavigationAction::SetupLaunched) => state.screen = Screen::Setup,
        Action::Navigation(NavigationAction::CallLaunched)
        | Action::Calling(CallingAction::CallStartRequested) => state.screen = Screen::Call,
        Action::Navigation(NavigationAction::Exit) | Action::Error(ErrorAction::EmergencyExit) => {
            state.screen = Screen::Exit;
        }
        Action::Error(
            ErrorAction::ErrorOccurred(error) | ErrorAction::CallStateErrorOccurred(error),
        ) if error.code.is_fatal() => {
            state.screen = Screen::Exit;
        }
        _ => {}
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{CompositeError, ErrorCode};

    #[test]
    fn test_exit_is_terminal() {
        let state = reduce(
            NavigationState::default(),
            &Action::Navigation(NavigationAction::SetupLaunched),
        );
        assert_eq!(state.screen, Screen::Setup);

        let state = reduce(state, &Action::Error(ErrorAction::EmergencyExit));
        let state = reduce(state, &Action::Navigation(NavigationAction::CallLaunched));
        assert_eq!(state.screen, Screen::Exit);
    }

    #[test]
    fn test_only_fatal_errors_leave_the_call() {
        let state = NavigationState {
            screen: Screen::Call,
        };
        let camera = CompositeError::new(ErrorCode::CameraFailed, "busy");
        let state = reduce(state, &Action::Error(ErrorAction::ErrorOccurred(camera)));
        assert_eq!(state.screen, Screen::Call);

        let declined = CompositeError::new(ErrorCode::CallDeclined, "declined");
        let state = reduce(
            state,
            &Action::Error(ErrorAction::CallStateErrorOccurred(declined)),
        );
        assert_eq!(state.screen, Screen::Exit);
    }
}
