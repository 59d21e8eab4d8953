//! Audio Device Middleware
//!
//! Validates output device selections and performs the switch on the
//! runtime. Only one switch is in flight at a time; selections arriving
//! meanwhile are dropped.

use super::{AppNext, AppStore};
use crate::actions::{Action, AudioAction};
use crate::domain_models::AudioDevice;
use crate::platform::{AudioRouter, PlatformError};
use crate::state::AppState;
use composite_store::Middleware;
use std::sync::Arc;
use tokio::runtime::Handle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingSwitch {
    target: AudioDevice,
    previous: AudioDevice,
}

pub struct AudioDeviceMiddleware {
    router: Arc<dyn AudioRouter>,
    runtime: Handle,
    restore_on_failure: bool,
    switching: Option<PendingSwitch>,
}

impl AudioDeviceMiddleware {
    pub fn new(router: Arc<dyn AudioRouter>, runtime: Handle, restore_on_failure: bool) -> Self {
        Self {
            router,
            runtime,
            restore_on_failure,
            switching: None,
        }
    }

    fn select(&mut self, target: AudioDevice, store: &AppStore, next: &mut AppNext<'_>) {
        let audio = store.state().audio.clone();
        let previous = audio.current;

        if !audio.is_available(target) {
            log::warn!("AudioDeviceMiddleware: {} is not available", target);
            next.run(Action::Audio(AudioAction::SwitchFailed {
                target,
                previous,
                reason: format!("{} is not available", target),
            }));
            return;
        }

        if let Some(pending) = self.switching {
            log::debug!(
                "AudioDeviceMiddleware: switch to {} in flight, ignoring {}",
                pending.target,
                target
            );
            return;
        }

        if target == previous {
            log::debug!("AudioDeviceMiddleware: already routed to {}", target);
            return;
        }

        self.switching = Some(PendingSwitch { target, previous });
        next.run(Action::Audio(AudioAction::SwitchStarted { target, previous }));

        let router = Arc::clone(&self.router);
        let dispatcher = store.dispatcher();
        self.runtime.spawn(async move {
            // Run the platform call in its own task so a panic surfaces as a failure
            let outcome = match tokio::spawn(async move { router.route_to(target).await }).await {
                Ok(outcome) => outcome,
                Err(e) => Err(PlatformError::Failed(format!("audio route task failed: {}", e))),
            };

            let action = match outcome {
                Ok(()) => {
                    log::info!("AudioDeviceMiddleware: routed to {}", target);
                    AudioAction::SwitchCompleted { device: target }
                }
                Err(e) => {
                    log::warn!("AudioDeviceMiddleware: switch to {} failed: {}", target, e);
                    AudioAction::SwitchFailed {
                        target,
                        previous,
                        reason: e.to_string(),
                    }
                }
            };
            dispatcher.dispatch(Action::Audio(action));
        });
    }

    fn restore(&self, previous: AudioDevice) {
        let router = Arc::clone(&self.router);
        self.runtime.spawn(async move {
            match router.route_to(previous).await {
                Ok(()) => log::info!("AudioDeviceMiddleware: restored route to {}", previous),
                Err(e) => log::warn!(
                    "AudioDeviceMiddleware: could not restore route to {}: {}",
                    previous,
                    e
                ),
            }
        });
    }
}

impl Middleware<AppState, Action> for AudioDeviceMiddleware {
    fn attach(&mut self, store: &AppStore) {
        let devices = self.router.available_devices();
        log::debug!("AudioDeviceMiddleware: available devices {:?}", devices);
        store.dispatch(Action::Audio(AudioAction::AvailableDevicesUpdated(devices)));
    }

    fn handle(&mut self, action: Action, store: &AppStore, next: &mut AppNext<'_>) {
        match action {
            Action::Audio(AudioAction::DeviceSelectRequested(target)) => {
                self.select(target, store, next);
            }
            Action::Audio(AudioAction::SwitchCompleted { device }) => {
                self.switching = None;
                next.run(Action::Audio(AudioAction::SwitchCompleted { device }));
            }
            Action::Audio(AudioAction::SwitchFailed {
                target,
                previous,
                reason,
            }) => {
                let pending = self.switching.take();
                next.run(Action::Audio(AudioAction::SwitchFailed {
                    target,
                    previous,
                    reason,
                }));

                let attempted = pending.is_some_and(|pending| pending.target == target);
                if attempted && self.restore_on_failure {
                    self.restore(previous);
                }
            }
            other => next.run(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::middleware::test_support::{store_with, wait_until};
    use crate::platform::simulated::SimulatedAudioRouter;
    use crate::state::SwitchStatus;
    use pretty_assertions::assert_eq;
    use std::thread;
    use std::time::Duration;
    use tokio::runtime::Runtime;

    fn select(device: AudioDevice) -> Action {
        Action::Audio(AudioAction::DeviceSelectRequested(device))
    }

    #[test]
    fn test_successful_switch() {
        let runtime = Runtime::new().unwrap();
        let router = Arc::new(SimulatedAudioRouter::default());
        let store = store_with(vec![Box::new(AudioDeviceMiddleware::new(
            router.clone(),
            runtime.handle().clone(),
            true,
        ))]);

        store.dispatch(select(AudioDevice::Speaker));
        wait_until(&store, |state| state.audio.switch == SwitchStatus::Idle);

        assert_eq!(store.current_state().audio.current, AudioDevice::Speaker);
        assert_eq!(router.routed(), vec![AudioDevice::Speaker]);
    }

    #[test]
    fn test_unavailable_device_fails_without_routing() {
        let runtime = Runtime::new().unwrap();
        let router = Arc::new(SimulatedAudioRouter::default());
        let store = store_with(vec![Box::new(AudioDeviceMiddleware::new(
            router.clone(),
            runtime.handle().clone(),
            true,
        ))]);

        store.dispatch(select(AudioDevice::Bluetooth));

        let state = store.current_state();
        assert_eq!(state.audio.current, AudioDevice::Receiver);
        assert_eq!(
            state.errors.notice.as_ref().map(|n| n.error.code),
            Some(ErrorCode::AudioDeviceSwitchFailed)
        );
        assert!(router.routed().is_empty());
    }

    #[test]
    fn test_selecting_current_device_is_a_noop() {
        let runtime = Runtime::new().unwrap();
        let router = Arc::new(SimulatedAudioRouter::default());
        let store = store_with(vec![Box::new(AudioDeviceMiddleware::new(
            router.clone(),
            runtime.handle().clone(),
            true,
        ))]);
        let version = store.version();

        store.dispatch(select(AudioDevice::Receiver));

        assert_eq!(store.version(), version);
        assert!(router.routed().is_empty());
    }

    #[test]
    fn test_failed_switch_restores_previous_route() {
        let runtime = Runtime::new().unwrap();
        let router = Arc::new(SimulatedAudioRouter::default());
        router.fail(AudioDevice::Speaker);
        let store = store_with(vec![Box::new(AudioDeviceMiddleware::new(
            router.clone(),
            runtime.handle().clone(),
            true,
        ))]);

        store.dispatch(select(AudioDevice::Speaker));
        wait_until(&store, |state| state.errors.notice.is_some());

        assert_eq!(store.current_state().audio.current, AudioDevice::Receiver);
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while router.routed().is_empty() && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(router.routed(), vec![AudioDevice::Receiver]);
    }

    #[test]
    fn test_second_selection_during_switch_is_dropped() {
        let runtime = Runtime::new().unwrap();
        let router = Arc::new(
            SimulatedAudioRouter::new([
                AudioDevice::Receiver,
                AudioDevice::Speaker,
                AudioDevice::WiredHeadset,
            ])
            .with_latency(Duration::from_millis(50)),
        );
        let store = store_with(vec![Box::new(AudioDeviceMiddleware::new(
            router.clone(),
            runtime.handle().clone(),
            true,
        ))]);

        store.dispatch(select(AudioDevice::Speaker));
        store.dispatch(select(AudioDevice::WiredHeadset));
        wait_until(&store, |state| state.audio.switch == SwitchStatus::Idle);

        assert_eq!(store.current_state().audio.current, AudioDevice::Speaker);
        assert_eq!(router.routed(), vec![AudioDevice::Speaker]);
    }

    #[test]
    fn test_unavailable_selection_during_switch_only_adds_notice() {
        let runtime = Runtime::new().unwrap();
        let router = Arc::new(
            SimulatedAudioRouter::default().with_latency(Duration::from_millis(300)),
        );
        let store = store_with(vec![Box::new(AudioDeviceMiddleware::new(
            router.clone(),
            runtime.handle().clone(),
            true,
        ))]);

        store.dispatch(select(AudioDevice::Speaker));
        store.dispatch(select(AudioDevice::Bluetooth));

        let state = store.current_state();
        assert_eq!(
            state.audio.switch,
            SwitchStatus::Switching {
                target: AudioDevice::Speaker,
                previous: AudioDevice::Receiver,
            }
        );
        assert_eq!(
            state.errors.notice.as_ref().map(|n| n.error.code),
            Some(ErrorCode::AudioDeviceSwitchFailed)
        );

        wait_until(&store, |state| state.audio.switch == SwitchStatus::Idle);
        assert_eq!(store.current_state().audio.current, AudioDevice::Speaker);
        assert_eq!(router.routed(), vec![AudioDevice::Speaker]);
    }
}
