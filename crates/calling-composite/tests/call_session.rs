use calling_composite::actions::{Action, AudioAction, CallingAction, ErrorAction, LocalUserAction};
use calling_composite::domain_models::{
    AudioDevice, CallEndReason, CallStatus, PermissionStatus, RemoteParticipant,
};
use calling_composite::platform::simulated::{
    SdkOperation, SimulatedAudioFocus, SimulatedAudioRouter, SimulatedCallingSdk,
};
use calling_composite::platform::{CallLocator, FocusChange};
use calling_composite::sdk_events::SdkEvent;
use calling_composite::state::{AudioFocusStatus, MicOperation, Screen};
use calling_composite::{AppState, CallComposite, CompositeEventHandlers, ErrorCode};
use composite_config::{CompositeConfig, DispatchSetting, EmissionSetting};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

struct Platform {
    sdk: Arc<SimulatedCallingSdk>,
    focus: Arc<SimulatedAudioFocus>,
    router: Arc<SimulatedAudioRouter>,
}

impl Platform {
    fn new() -> Self {
        Self {
            sdk: Arc::new(SimulatedCallingSdk::new()),
            focus: Arc::new(SimulatedAudioFocus::new()),
            router: Arc::new(SimulatedAudioRouter::new([
                AudioDevice::Receiver,
                AudioDevice::Speaker,
                AudioDevice::WiredHeadset,
            ])),
        }
    }

    fn composite(&self, config: CompositeConfig, handlers: CompositeEventHandlers) -> CallComposite {
        CallComposite::builder(
            self.sdk.clone(),
            self.focus.clone(),
            self.router.clone(),
            CallLocator::Room("room-1".to_string()),
        )
        .config(config)
        .handlers(handlers)
        .build()
        .unwrap()
    }
}

fn config(dispatch: DispatchSetting, emission: EmissionSetting) -> CompositeConfig {
    let mut config = CompositeConfig::default();
    config.display_name = "Ada".to_string();
    config.store.dispatch = dispatch;
    config.store.emission = emission;
    config.store.debounce_ms = 5;
    config.features.accessibility_announcements = false;
    config
}

fn wait_until(composite: &CallComposite, predicate: impl Fn(&AppState) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !predicate(&composite.state()) {
        assert!(
            Instant::now() < deadline,
            "condition not reached, state: {:#?}",
            composite.state()
        );
        thread::sleep(Duration::from_millis(2));
    }
}

fn join(composite: &CallComposite) {
    composite.launch();
    composite.set_audio_permission(PermissionStatus::Granted);
    composite.join();
    wait_until(composite, |s| s.call.status == CallStatus::Connected);
}

#[test]
fn test_full_call_in_every_store_mode() {
    for (dispatch, emission) in [
        (DispatchSetting::Immediate, EmissionSetting::Inline),
        (DispatchSetting::Threaded, EmissionSetting::Worker),
        (DispatchSetting::Threaded, EmissionSetting::Debounced),
    ] {
        let platform = Platform::new();
        let composite = platform.composite(config(dispatch, emission), CompositeEventHandlers::new());

        join(&composite);
        composite.dispatch(Action::LocalUser(LocalUserAction::MicOnTriggered));
        wait_until(&composite, |s| s.local_user.mic == MicOperation::On);

        composite.hang_up();
        wait_until(&composite, |s| s.navigation.screen == Screen::Exit);

        let state = composite.state();
        assert!(state.call.was_connected, "{:?}/{:?}", dispatch, emission);
        assert_eq!(state.errors.fatal, None);
        assert_eq!(
            platform.sdk.calls(),
            vec![
                SdkOperation::StartCall,
                SdkOperation::Microphone,
                SdkOperation::EndCall
            ]
        );
        assert_eq!(platform.focus.abandons(), 1);
        composite.end();
    }
}

#[test]
fn test_host_handlers_receive_roster_and_exit() {
    let platform = Platform::new();
    let events = Arc::new(Mutex::new(Vec::new()));
    let (joined, left, exit) = (events.clone(), events.clone(), events.clone());
    let handlers = CompositeEventHandlers::new()
        .on_remote_participant_joined(move |participants| {
            for p in participants {
                joined.lock().unwrap().push(format!("+{}", p.label()));
            }
        })
        .on_remote_participant_left(move |participants| {
            for p in participants {
                left.lock().unwrap().push(format!("-{}", p.label()));
            }
        })
        .on_exit(move || exit.lock().unwrap().push("exit".to_string()));
    let composite = platform.composite(
        config(DispatchSetting::Immediate, EmissionSetting::Inline),
        handlers,
    );

    join(&composite);
    platform.sdk.emit(SdkEvent::RemoteParticipantsUpdated(vec![
        RemoteParticipant::new("1", "Grace"),
    ]));
    platform
        .sdk
        .emit(SdkEvent::RemoteParticipantsRemoved(vec!["1".to_string()]));
    platform.sdk.emit(SdkEvent::CallStateChanged {
        status: CallStatus::Disconnected,
        end_reason: Some(CallEndReason::new(0, 0)),
    });

    assert_eq!(*events.lock().unwrap(), vec!["+Grace", "-Grace", "exit"]);
}

#[test]
fn test_token_expiry_tears_the_session_down() {
    let platform = Platform::new();
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    let handlers = CompositeEventHandlers::new().on_error(move |error| sink.lock().unwrap().push(error.code));
    let composite = platform.composite(
        config(DispatchSetting::Threaded, EmissionSetting::Worker),
        handlers,
    );
    join(&composite);

    platform.sdk.emit(SdkEvent::CallStateChanged {
        status: CallStatus::Disconnected,
        end_reason: Some(CallEndReason::new(401, 0)),
    });
    wait_until(&composite, |s| s.navigation.screen == Screen::Exit);

    let state = composite.state();
    assert_eq!(
        state.errors.call_state_error.as_ref().map(|e| e.code),
        Some(ErrorCode::TokenExpired)
    );
    wait_until(&composite, |_| !errors.lock().unwrap().is_empty());
    assert_eq!(*errors.lock().unwrap(), vec![ErrorCode::TokenExpired]);
}

#[test]
fn test_failed_device_switch_keeps_previous_route() {
    let platform = Platform::new();
    platform.router.fail(AudioDevice::WiredHeadset);
    let composite = platform.composite(
        config(DispatchSetting::Threaded, EmissionSetting::Inline),
        CompositeEventHandlers::new(),
    );

    composite.dispatch(Action::Audio(AudioAction::DeviceSelectRequested(AudioDevice::Speaker)));
    wait_until(&composite, |s| s.audio.current == AudioDevice::Speaker);

    composite.dispatch(Action::Audio(AudioAction::DeviceSelectRequested(
        AudioDevice::WiredHeadset,
    )));
    wait_until(&composite, |s| s.errors.notice.is_some());

    let state = composite.state();
    assert_eq!(state.audio.current, AudioDevice::Speaker);
    assert!(!state.audio.is_switching());
    assert_eq!(
        state.errors.notice.as_ref().map(|n| n.error.code),
        Some(ErrorCode::AudioDeviceSwitchFailed)
    );

    composite.dispatch(Action::Error(ErrorAction::NoticeDismissed));
    composite.dispatch(Action::Audio(AudioAction::DeviceSelectRequested(AudioDevice::Bluetooth)));
    wait_until(&composite, |s| s.errors.notice.is_some());
    assert_eq!(composite.state().audio.current, AudioDevice::Speaker);
}

#[test]
fn test_focus_denial_blocks_the_call() {
    let platform = Platform::new();
    platform.focus.set_granted(false);
    let composite = platform.composite(
        config(DispatchSetting::Immediate, EmissionSetting::Inline),
        CompositeEventHandlers::new(),
    );

    composite.launch();
    composite.join();

    let state = composite.state();
    assert_eq!(state.audio_session.focus, AudioFocusStatus::Rejected);
    assert!(!state.call.join_requested);
    assert!(platform.sdk.calls().is_empty());
}

#[test]
fn test_focus_loss_puts_the_call_on_hold() {
    let platform = Platform::new();
    let composite = platform.composite(
        config(DispatchSetting::Threaded, EmissionSetting::Worker),
        CompositeEventHandlers::new(),
    );
    join(&composite);

    platform.focus.notify(FocusChange::Lost);
    wait_until(&composite, |s| s.call.status == CallStatus::LocalHold);

    composite.dispatch(Action::Calling(CallingAction::ResumeRequested));
    wait_until(&composite, |s| s.call.status == CallStatus::Connected);
    assert_eq!(composite.state().audio_session.focus, AudioFocusStatus::Approved);
}

#[test]
fn test_ended_composite_ignores_everything() {
    let platform = Platform::new();
    let composite = platform.composite(
        config(DispatchSetting::Threaded, EmissionSetting::Debounced),
        CompositeEventHandlers::new(),
    );
    join(&composite);

    composite.dismiss();
    composite.dismiss();
    let version_state = composite.state();
    composite.dispatch(Action::Calling(CallingAction::HoldRequested));
    platform.sdk.emit(SdkEvent::RecordingChanged(true));
    thread::sleep(Duration::from_millis(30));

    assert!(composite.is_ended());
    assert_eq!(composite.state(), version_state);
    assert_eq!(
        platform.sdk.calls(),
        vec![SdkOperation::StartCall, SdkOperation::EndCall]
    );
}

#[test]
fn test_dismiss_notifies_host_exit_once() {
    for (dispatch, emission) in [
        (DispatchSetting::Immediate, EmissionSetting::Inline),
        (DispatchSetting::Threaded, EmissionSetting::Debounced),
    ] {
        let platform = Platform::new();
        let exits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&exits);
        let composite = platform.composite(
            config(dispatch, emission),
            CompositeEventHandlers::new().on_exit(move || *counter.lock().unwrap() += 1),
        );
        join(&composite);

        composite.dismiss();
        drop(composite);

        assert_eq!(*exits.lock().unwrap(), 1, "{:?}/{:?}", dispatch, emission);
    }
}
