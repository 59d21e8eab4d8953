//! Application State

use super::{
    AudioSessionState, AudioState, CallState, ErrorState, LifecycleState, LocalUserState,
    NavigationState, PermissionState, RemoteParticipantsState,
};

/// Composite state snapshot
///
/// Every field is an independent sub-state. A new `AppState` is assembled
/// on each reduction and swapped in as a whole.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub call: CallState,
    pub participants: RemoteParticipantsState,
    pub local_user: LocalUserState,
    pub permissions: PermissionState,
    pub audio: AudioState,
    pub audio_session: AudioSessionState,
    pub errors: ErrorState,
    pub navigation: NavigationState,
    pub lifecycle: LifecycleState,
}

impl AppState {
    /// Initial state for a session joining as `display_name`
    pub fn for_user(display_name: impl Into<String>) -> Self {
        Self {
            local_user: LocalUserState {
                display_name: display_name.into(),
                ..LocalUserState::default()
            },
            ..Self::default()
        }
    }
}
