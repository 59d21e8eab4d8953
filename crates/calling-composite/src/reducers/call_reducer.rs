//! Call Reducer

use crate::actions::{Action, CallingAction};
use crate::domain_models::CallStatus;
use crate::state::CallState;

pub fn reduce(mut state: CallState, action: &Action) -> CallState {
    let Action::Calling(action) = action else {
        return state;
    };

    match action {
        CallingAction::CallStartRequested => {
            state.join_requested = true;
        }
        CallingAction::StateUpdated { status, .. } => {
            state.status = *status;
            match status {
                CallStatus::Connected => state.was_connected = true,
                CallStatus::Disconnected => state.join_requested = false,
                _ => {}
            }
        }
        CallingAction::CallIdUpdated(call_id) => {
            state.call_id = Some(call_id.clone());
        }
        CallingAction::RecordingUpdated(is_recording) => {
            state.is_recording = *is_recording;
        }
        CallingAction::TranscriptionUpdated(is_transcribing) => {
            state.is_transcribing = *is_transcribing;
        }
        CallingAction::NetworkQualityUpdated(quality) => {
            state.diagnostics.network_quality = Some(*quality);
        }
        CallingAction::NetworkAvailabilityUpdated(available) => {
            state.diagnostics.network_available = *available;
        }
        CallingAction::SpeakingWhileMutedUpdated(speaking) => {
            state.diagnostics.speaking_while_muted = *speaking;
        }
        CallingAction::CallEndRequested
        | CallingAction::HoldRequested
        | CallingAction::ResumeRequested => {}
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: CallStatus) -> Action {
        Action::Calling(CallingAction::StateUpdated {
            status,
            end_reason: None,
        })
    }

    #[test]
    fn test_connected_is_remembered_after_disconnect() {
        let state = reduce(CallState::default(), &Action::Calling(CallingAction::CallStartRequested));
        let state = reduce(state, &status(CallStatus::Connected));
        let state = reduce(state, &status(CallStatus::Disconnected));

        assert_eq!(state.status, CallStatus::Disconnected);
        assert!(state.was_connected);
        assert!(!state.join_requested);
    }

    #[test]
    fn test_unrelated_action_is_identity() {
        let state = CallState {
            is_recording: true,
            ..CallState::default()
        };
        let reduced = reduce(
            state.clone(),
            &Action::Navigation(crate::actions::NavigationAction::CallLaunched),
        );
        assert_eq!(reduced, state);
    }
}
