//! Local User State

use crate::domain_models::CameraFacing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MicOperation {
    #[default]
    Off,
    Pending,
    On,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraOperation {
    #[default]
    Off,
    /// Waiting for permission or for the SDK to start capturing
    Pending,
    On,
    /// Turned off while the app is in the background; resumes in foreground
    Paused,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CameraState {
    pub operation: CameraOperation,
    pub facing: CameraFacing,
    pub is_switching: bool,
    pub video_stream_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalUserState {
    pub display_name: String,
    pub mic: MicOperation,
    pub camera: CameraState,
}
