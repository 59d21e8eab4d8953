//! Audio Routing State

use crate::domain_models::AudioDevice;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchStatus {
    #[default]
    Idle,
    Switching {
        target: AudioDevice,
        previous: AudioDevice,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioState {
    pub current: AudioDevice,
    pub available: BTreeSet<AudioDevice>,
    pub switch: SwitchStatus,
}

impl AudioState {
    pub fn is_available(&self, device: AudioDevice) -> bool {
        self.available.contains(&device)
    }

    pub fn is_switching(&self) -> bool {
        matches!(self.switch, SwitchStatus::Switching { .. })
    }
}

impl Default for AudioState {
    fn default() -> Self {
        Self {
            current: AudioDevice::Receiver,
            available: AudioDevice::built_in().into_iter().collect(),
            switch: SwitchStatus::Idle,
        }
    }
}
