//! Error Reducer
//!
//! Fatal errors are sticky (first one wins). Everything else becomes a
//! transient notice that replaces the previous one.

use crate::actions::{
    Action, AudioAction, AudioSessionAction, CallingAction, ErrorAction, LocalUserAction,
};
use crate::errors::{CompositeError, ErrorCode};
use crate::state::{ErrorState, Notice};

pub fn reduce(mut state: ErrorState, action: &Action) -> ErrorState {
    match action {
        Action::Error(ErrorAction::ErrorOccurred(error)) => record(&mut state, error.clone()),
        Action::Error(ErrorAction::CallStateErrorOccurred(error)) => {
            state.call_state_error = Some(error.clone());
            if error.code.is_fatal() && state.fatal.is_none() {
                state.fatal = Some(error.clone());
            }
        }
        Action::Error(ErrorAction::NoticeDismissed) => state.notice = None,
        Action::Calling(CallingAction::CallStartRequested) => state.call_state_error = None,
        _ => {
            if let Some(error) = notice_for(action) {
                record(&mut state, error);
            }
        }
    }
    state
}

fn record(state: &mut ErrorState, error: CompositeError) {
    if error.code.is_fatal() {
        if state.fatal.is_none() {
            state.fatal = Some(error);
        }
    } else {
        state.notice = Some(Notice { error });
    }
}

/// Failure outcomes reported by other domains that the user should see
fn notice_for(action: &Action) -> Option<CompositeError> {
    let error = match action {
        Action::Audio(AudioAction::SwitchFailed { target, reason, .. }) => CompositeError::new(
            ErrorCode::AudioDeviceSwitchFailed,
            format!("Could not switch audio to {}: {}", target, reason),
        ),
        Action::AudioSession(AudioSessionAction::FocusRejected { reason }) => {
            CompositeError::new(ErrorCode::AudioFocusDenied, reason.clone())
        }
        Action::LocalUser(
            LocalUserAction::MicOnFailed { reason } | LocalUserAction::MicOffFailed { reason },
        ) => CompositeError::new(ErrorCode::MicrophoneFailed, reason.clone()),
        Action::LocalUser(
            LocalUserAction::CameraOnFailed { reason } | LocalUserAction::CameraOffFailed { reason },
        ) => CompositeError::new(ErrorCode::CameraFailed, reason.clone()),
        Action::LocalUser(LocalUserAction::CameraSwitchFailed { reason, .. }) => {
            CompositeError::new(ErrorCode::SwitchCameraFailed, reason.clone())
        }
        _ => return None,
    };
    Some(error)
}
