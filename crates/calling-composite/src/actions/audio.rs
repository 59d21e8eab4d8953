//! Audio routing actions

use crate::domain_models::AudioDevice;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub enum AudioAction {
    /// User picked an output device
    DeviceSelectRequested(AudioDevice),
    SwitchStarted {
        target: AudioDevice,
        previous: AudioDevice,
    },
    SwitchCompleted {
        device: AudioDevice,
    },
    /// Switch rejected or failed; the route stays on / goes back to `previous`
    SwitchFailed {
        target: AudioDevice,
        previous: AudioDevice,
        reason: String,
    },
    /// Platform reported the set of routes currently available
    AvailableDevicesUpdated(BTreeSet<AudioDevice>),
}
