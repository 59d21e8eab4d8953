//! Control Bar View Model
//!
//! Microphone, camera, audio device and hang-up controls.

use crate::actions::{Action, AudioAction, CallingAction, LocalUserAction};
use crate::domain_models::AudioDevice;
use crate::state::{AppState, CameraOperation, MicOperation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDeviceOption {
    pub device: AudioDevice,
    pub label: String,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlBarViewModel {
    pub is_mic_on: bool,
    pub is_camera_on: bool,
    /// A toggle is waiting for the SDK; the buttons are disabled meanwhile
    pub is_mic_busy: bool,
    pub is_camera_busy: bool,
    pub is_switching_audio: bool,
    pub audio_devices: Vec<AudioDeviceOption>,
    pub can_hang_up: bool,
}

impl ControlBarViewModel {
    pub fn from_state(state: &AppState) -> Self {
        let camera = state.local_user.camera.operation;
        let audio_devices = state
            .audio
            .available
            .iter()
            .map(|device| AudioDeviceOption {
                device: *device,
                label: device.to_string(),
                is_selected: *device == state.audio.current,
            })
            .collect();

        Self {
            is_mic_on: state.local_user.mic == MicOperation::On,
            is_camera_on: camera == CameraOperation::On,
            is_mic_busy: state.local_user.mic == MicOperation::Pending,
            is_camera_busy: camera == CameraOperation::Pending || state.local_user.camera.is_switching,
            is_switching_audio: state.audio.is_switching(),
            audio_devices,
            can_hang_up: !state.call.status.is_ended(),
        }
    }

    pub fn toggle_microphone(&self) -> Option<Action> {
        if self.is_mic_busy {
            return None;
        }
        let action = if self.is_mic_on {
            LocalUserAction::MicOffTriggered
        } else {
            LocalUserAction::MicOnTriggered
        };
        Some(Action::LocalUser(action))
    }

    pub fn toggle_camera(&self) -> Option<Action> {
        if self.is_camera_busy {
            return None;
        }
        let action = if self.is_camera_on {
            LocalUserAction::CameraOffTriggered
        } else {
            LocalUserAction::CameraOnRequested
        };
        Some(Action::LocalUser(action))
    }

    pub fn switch_camera(&self) -> Option<Action> {
        (self.is_camera_on && !self.is_camera_busy)
            .then_some(Action::LocalUser(LocalUserAction::CameraSwitchTriggered))
    }

    pub fn select_audio_device(&self, device: AudioDevice) -> Action {
        Action::Audio(AudioAction::DeviceSelectRequested(device))
    }

    pub fn hang_up(&self) -> Option<Action> {
        self.can_hang_up
            .then_some(Action::Calling(CallingAction::CallEndRequested))
    }
}
