//! Audio Routing Reducer

use crate::actions::{Action, AudioAction};
use crate::domain_models::AudioDevice;
use crate::state::{AudioState, SwitchStatus};

pub fn reduce(mut state: AudioState, action: &Action) -> AudioState {
    let Action::Audio(action) = action else {
        return state;
    };

    match action {
        AudioAction::SwitchStarted { target, previous } => {
            state.switch = SwitchStatus::Switching {
                target: *target,
                previous: *previous,
            };
        }
        AudioAction::SwitchCompleted { device } => {
            state.current = *device;
            state.switch = SwitchStatus::Idle;
        }
        AudioAction::SwitchFailed {
            target, previous, ..
        } => match state.switch {
            // A rejected selection leaves the switch in flight untouched
            SwitchStatus::Switching {
                target: pending, ..
            } if pending != *target => {}
            _ => {
                state.current = *previous;
                state.switch = SwitchStatus::Idle;
            }
        },
        AudioAction::AvailableDevicesUpdated(devices) => {
            state.available = devices.clone();
            // The platform falls back to the earpiece when the active route disappears
            if !state.available.contains(&state.current) {
                if let Some(fallback) = fallback_device(&state) {
                    state.current = fallback;
                }
            }
        }
        AudioAction::DeviceSelectRequested(_) => {}
    }
    state
}

fn fallback_device(state: &AudioState) -> Option<AudioDevice> {
    if state.is_available(AudioDevice::Receiver) {
        Some(AudioDevice::Receiver)
    } else {
        state.available.iter().next().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn audio(action: AudioAction) -> Action {
        Action::Audio(action)
    }

    #[test]
    fn test_switch_completes() {
        let state = reduce(
            AudioState::default(),
            &audio(AudioAction::SwitchStarted {
                target: AudioDevice::Speaker,
                previous: AudioDevice::Receiver,
            }),
        );
        assert!(state.is_switching());

        let state = reduce(
            state,
            &audio(AudioAction::SwitchCompleted {
                device: AudioDevice::Speaker,
            }),
        );
        assert_eq!(state.current, AudioDevice::Speaker);
        assert_eq!(state.switch, SwitchStatus::Idle);
    }

    #[test]
    fn test_failed_switch_keeps_previous_device() {
        let state = AudioState {
            current: AudioDevice::Speaker,
            ..AudioState::default()
        };
        let state = reduce(
            state,
            &audio(AudioAction::SwitchFailed {
                target: AudioDevice::Bluetooth,
                previous: AudioDevice::Speaker,
                reason: "route lost".to_string(),
            }),
        );
        assert_eq!(state.current, AudioDevice::Speaker);
        assert!(!state.is_switching());
    }

    #[test]
    fn test_rejected_selection_keeps_switch_in_flight() {
        let in_flight = SwitchStatus::Switching {
            target: AudioDevice::Speaker,
            previous: AudioDevice::Receiver,
        };
        let state = AudioState {
            switch: in_flight,
            ..AudioState::default()
        };
        let state = reduce(
            state,
            &audio(AudioAction::SwitchFailed {
                target: AudioDevice::Bluetooth,
                previous: AudioDevice::Receiver,
                reason: "Bluetooth is not available".to_string(),
            }),
        );
        assert_eq!(state.switch, in_flight);
        assert_eq!(state.current, AudioDevice::Receiver);

        let state = reduce(
            state,
            &audio(AudioAction::SwitchFailed {
                target: AudioDevice::Speaker,
                previous: AudioDevice::Receiver,
                reason: "route lost".to_string(),
            }),
        );
        assert_eq!(state.switch, SwitchStatus::Idle);
    }

    #[test]
    fn test_disappearing_route_falls_back_to_receiver() {
        let state = AudioState {
            current: AudioDevice::Bluetooth,
            available: BTreeSet::from([
                AudioDevice::Receiver,
                AudioDevice::Speaker,
                AudioDevice::Bluetooth,
            ]),
            switch: SwitchStatus::Idle,
        };
        let state = reduce(
            state,
            &audio(AudioAction::AvailableDevicesUpdated(BTreeSet::from(
                AudioDevice::built_in(),
            ))),
        );
        assert_eq!(state.current, AudioDevice::Receiver);
    }
}
