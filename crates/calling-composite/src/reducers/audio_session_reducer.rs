use crate::actions::{Action, AudioSessionAction};
use crate::platform::FocusChange;
use crate::state::{AudioFocusStatus, AudioSessionState};

pub fn reduce(mut state: AudioSessionState, action: &Action) -> AudioSessionState {
    let Action::AudioSession(action) = action else {
        return state;
    };

    state.focus = match action {
        AudioSessionAction::FocusApproved => AudioFocusStatus::Approved,
        AudioSessionAction::FocusRejected { .. } => AudioFocusStatus::Rejected,
        AudioSessionAction::FocusChanged(FocusChange::Gained) => AudioFocusStatus::Approved,
        AudioSessionAction::FocusChanged(FocusChange::Lost | FocusChange::LostTransient) => {
            match state.focus {
                AudioFocusStatus::Approved => AudioFocusStatus::Interrupted,
                other => other,
            }
        }
    };
    state
}
