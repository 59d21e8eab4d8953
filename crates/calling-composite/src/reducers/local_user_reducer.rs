//! Local User Reducer

use crate::actions::{Action, LocalUserAction, PermissionAction};
use crate::domain_models::PermissionStatus;
use crate::state::{CameraOperation, LocalUserState, MicOperation};

pub fn reduce(mut state: LocalUserState, action: &Action) -> LocalUserState {
    match action {
        Action::LocalUser(action) => reduce_local_user(&mut state, action),
        // A camera waiting for permission gives up when permission is denied
        Action::Permission(PermissionAction::CameraPermissionIsSet(PermissionStatus::Denied))
            if state.camera.operation == CameraOperation::Pending =>
        {
            state.camera.operation = CameraOperation::Off;
        }
        _ => {}
    }
    state
}

fn reduce_local_user(state: &mut LocalUserState, action: &LocalUserAction) {
    let camera = &mut state.camera;
    match action {
        LocalUserAction::MicOnTriggered | LocalUserAction::MicOffTriggered => {
            state.mic = MicOperation::Pending;
        }
        LocalUserAction::MicOnSucceeded | LocalUserAction::MicOffFailed { .. } => {
            state.mic = MicOperation::On;
        }
        LocalUserAction::MicOffSucceeded | LocalUserAction::MicOnFailed { .. } => {
            state.mic = MicOperation::Off;
        }
        LocalUserAction::MicStateSynced { is_on } => {
            state.mic = if *is_on {
                MicOperation::On
            } else {
                MicOperation::Off
            };
        }
        LocalUserAction::CameraOnRequested
        | LocalUserAction::CameraOffTriggered
        | LocalUserAction::CameraPreviewOnRequested => {
            camera.operation = CameraOperation::Pending;
        }
        LocalUserAction::CameraOnSucceeded { stream_id }
        | LocalUserAction::CameraPreviewOnSucceeded { stream_id } => {
            camera.operation = CameraOperation::On;
            camera.video_stream_id = Some(stream_id.clone());
        }
        LocalUserAction::CameraOffFailed { .. } => {
            camera.operation = CameraOperation::On;
        }
        LocalUserAction::CameraOnFailed { .. } | LocalUserAction::CameraOffSucceeded => {
            camera.operation = CameraOperation::Off;
            camera.video_stream_id = None;
        }
        LocalUserAction::CameraPauseSucceeded => {
            camera.operation = CameraOperation::Paused;
            camera.video_stream_id = None;
        }
        LocalUserAction::CameraSwitchTriggered => {
            camera.is_switching = true;
        }
        LocalUserAction::CameraSwitchSucceeded(facing) => {
            camera.facing = *facing;
            camera.is_switching = false;
        }
        LocalUserAction::CameraSwitchFailed { previous, .. } => {
            camera.facing = *previous;
            camera.is_switching = false;
        }
        LocalUserAction::DisplayNameSet(name) => {
            state.display_name = name.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_models::CameraFacing;

    fn apply(state: LocalUserState, actions: &[LocalUserAction]) -> LocalUserState {
        actions
            .iter()
            .fold(state, |state, action| reduce(state, &Action::LocalUser(action.clone())))
    }

    #[test]
    fn test_failed_mic_toggle_returns_to_previous() {
        let state = apply(
            LocalUserState::default(),
            &[
                LocalUserAction::MicOnTriggered,
                LocalUserAction::MicOnFailed {
                    reason: "busy".to_string(),
                },
            ],
        );
        assert_eq!(state.mic, MicOperation::Off);

        let state = apply(
            state,
            &[
                LocalUserAction::MicOnTriggered,
                LocalUserAction::MicOnSucceeded,
                LocalUserAction::MicOffTriggered,
                LocalUserAction::MicOffFailed {
                    reason: "busy".to_string(),
                },
            ],
        );
        assert_eq!(state.mic, MicOperation::On);
    }

    #[test]
    fn test_camera_switch_failure_restores_facing() {
        let state = apply(
            LocalUserState::default(),
            &[
                LocalUserAction::CameraSwitchTriggered,
                LocalUserAction::CameraSwitchFailed {
                    previous: CameraFacing::Front,
                    reason: "no back camera".to_string(),
                },
            ],
        );
        assert_eq!(state.camera.facing, CameraFacing::Front);
        assert!(!state.camera.is_switching);
    }

    #[test]
    fn test_denied_permission_cancels_pending_camera() {
        let state = apply(LocalUserState::default(), &[LocalUserAction::CameraOnRequested]);
        let state = reduce(
            state,
            &Action::Permission(PermissionAction::CameraPermissionIsSet(
                PermissionStatus::Denied,
            )),
        );
        assert_eq!(state.camera.operation, CameraOperation::Off);
    }
}
