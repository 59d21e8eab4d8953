//! Local participant actions (microphone, camera)
//!
//! `*Triggered`/`*Requested` are intents, `*Succeeded`/`*Failed` are the
//! outcomes reported back by the calling action middleware.

use crate::domain_models::CameraFacing;

#[derive(Debug, Clone, PartialEq)]
pub enum LocalUserAction {
    MicOnTriggered,
    MicOnSucceeded,
    MicOnFailed { reason: String },
    MicOffTriggered,
    MicOffSucceeded,
    MicOffFailed { reason: String },
    /// Mute state changed outside our control (e.g. muted by a remote participant)
    MicStateSynced { is_on: bool },

    CameraOnRequested,
    CameraOnSucceeded { stream_id: String },
    CameraOnFailed { reason: String },
    CameraOffTriggered,
    CameraOffSucceeded,
    CameraOffFailed { reason: String },
    CameraPreviewOnRequested,
    CameraPreviewOnSucceeded { stream_id: String },
    /// Camera stopped because the app went to the background
    CameraPauseSucceeded,
    CameraSwitchTriggered,
    CameraSwitchSucceeded(CameraFacing),
    CameraSwitchFailed {
        previous: CameraFacing,
        reason: String,
    },

    DisplayNameSet(String),
}
