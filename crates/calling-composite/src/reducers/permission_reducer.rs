use crate::actions::{Action, PermissionAction};
use crate::domain_models::PermissionStatus;
use crate::state::PermissionState;

pub fn reduce(mut state: PermissionState, action: &Action) -> PermissionState {
    let Action::Permission(action) = action else {
        return state;
    };

    match action {
        PermissionAction::AudioPermissionRequested => state.audio = PermissionStatus::Requesting,
        PermissionAction::AudioPermissionIsSet(status) => state.audio = *status,
        PermissionAction::CameraPermissionRequested => state.camera = PermissionStatus::Requesting,
        PermissionAction::CameraPermissionIsSet(status) => state.camera = *status,
    }
    state
}
