//! Error Middleware
//!
//! Turns raw call end reasons into classified errors and escalates errors
//! that require an emergency exit.

use super::{AppNext, AppStore};
use crate::actions::{Action, CallingAction, ErrorAction};
use crate::domain_models::CallStatus;
use crate::errors::{classify_call_end, CompositeError};
use crate::state::AppState;
use composite_store::Middleware;

#[derive(Debug, Default)]
pub struct ErrorMiddleware;

impl ErrorMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Middleware<AppState, Action> for ErrorMiddleware {
    fn handle(&mut self, action: Action, store: &AppStore, next: &mut AppNext<'_>) {
        match &action {
            Action::Calling(CallingAction::StateUpdated {
                status: CallStatus::Disconnected,
                end_reason: Some(reason),
            }) => {
                let reason = *reason;
                let was_connected = store.state().call.was_connected;
                next.run(action);

                if let Some(code) = classify_call_end(reason, was_connected) {
                    let error = CompositeError::new(
                        code,
                        format!("Call ended with {}/{}", reason.code, reason.subcode),
                    );
                    log::warn!("ErrorMiddleware: {}", error);
                    store.dispatch(Action::Error(ErrorAction::CallStateErrorOccurred(error)));
                }
            }
            Action::Error(
                ErrorAction::ErrorOccurred(error) | ErrorAction::CallStateErrorOccurred(error),
            ) => {
                let emergency = error.code.requires_emergency_exit();
                if error.code.is_fatal() {
                    log::error!("ErrorMiddleware: fatal error {}", error);
                }
                next.run(action);

                if emergency {
                    store.dispatch(Action::Error(ErrorAction::EmergencyExit));
                }
            }
            _ => next.run(action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_models::CallEndReason;
    use crate::errors::ErrorCode;
    use crate::middleware::test_support::{store_with, Recorder};
    use crate::state::Screen;
    use std::sync::{Arc, Mutex};

    fn ended(code: u32, subcode: u32) -> Action {
        Action::Calling(CallingAction::StateUpdated {
            status: CallStatus::Disconnected,
            end_reason: Some(CallEndReason::new(code, subcode)),
        })
    }

    #[test]
    fn test_token_expiry_triggers_emergency_exit() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let store = store_with(vec![
            Box::new(ErrorMiddleware::new()),
            Box::new(Recorder(Arc::clone(&seen))),
        ]);

        store.dispatch(ended(401, 0));

        let state = store.current_state();
        assert_eq!(
            state.errors.call_state_error.as_ref().map(|e| e.code),
            Some(ErrorCode::TokenExpired)
        );
        assert_eq!(state.navigation.screen, Screen::Exit);
        assert_eq!(
            seen.lock().unwrap().last(),
            Some(&Action::Error(ErrorAction::EmergencyExit))
        );
    }

    #[test]
    fn test_regular_hang_up_raises_nothing() {
        let store = store_with(vec![Box::new(ErrorMiddleware::new())]);

        store.dispatch(ended(0, 0));

        let state = store.current_state();
        assert_eq!(state.errors.call_state_error, None);
        assert_eq!(store.version(), 1);
    }
}
