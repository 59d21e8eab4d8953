//! Demo session against the simulated platform
//!
//! Walks through a call the way a host application would drive it and
//! prints the host events it receives.

mod logger;

use anyhow::Result;
use calling_composite::actions::{Action, AudioAction, CallingAction, LocalUserAction};
use calling_composite::domain_models::{
    AudioDevice, CallEndReason, CallStatus, PermissionStatus, RemoteParticipant,
};
use calling_composite::platform::simulated::{
    SimulatedAudioFocus, SimulatedAudioRouter, SimulatedCallingSdk,
};
use calling_composite::platform::{CallLocator, FocusChange};
use calling_composite::sdk_events::SdkEvent;
use calling_composite::state::Screen;
use calling_composite::view_models::{CallHeaderViewModel, ControlBarViewModel};
use calling_composite::{AppState, CallComposite, CompositeEventHandlers};
use composite_config::CompositeConfig;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn wait_for(composite: &CallComposite, what: &str, predicate: impl Fn(&AppState) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(3);
    while !predicate(&composite.state()) {
        if Instant::now() > deadline {
            log::warn!("Timed out waiting for {}", what);
            return false;
        }
        thread::sleep(Duration::from_millis(10));
    }
    true
}

fn print_header(composite: &CallComposite) {
    let header = CallHeaderViewModel::from_state(&composite.state());
    println!(
        "[{}] {} participant(s){}",
        header.title,
        header.participant_count,
        header
            .warning
            .map(|w| format!(" - {}", w))
            .unwrap_or_default()
    );
}

fn main() -> Result<()> {
    let log_file = logger::init()?;
    log::info!("Starting calling-composite demo");

    let mut config = CompositeConfig::load();
    if config.display_name.is_empty() {
        config.display_name = "Demo User".to_string();
    }

    let sdk = Arc::new(SimulatedCallingSdk::new().with_latency(Duration::from_millis(30)));
    let focus = Arc::new(SimulatedAudioFocus::new());
    let router = Arc::new(
        SimulatedAudioRouter::new([
            AudioDevice::Receiver,
            AudioDevice::Speaker,
            AudioDevice::WiredHeadset,
        ])
        .with_latency(Duration::from_millis(20)),
    );
    router.fail(AudioDevice::WiredHeadset);

    let handlers = CompositeEventHandlers::new()
        .on_call_state_changed(|status| println!("call state: {}", status))
        .on_remote_participant_joined(|joined| {
            for participant in joined {
                println!("joined: {}", participant.label());
            }
        })
        .on_remote_participant_left(|left| {
            for participant in left {
                println!("left: {}", participant.label());
            }
        })
        .on_error(|error| println!("error: {}", error))
        .on_exit(|| println!("composite exited"));

    let composite = CallComposite::builder(
        sdk.clone(),
        focus.clone(),
        router.clone(),
        CallLocator::GroupCall("29228d3e-040e-4656-a70e-890ab4e173e5".to_string()),
    )
    .config(config)
    .handlers(handlers)
    .build()?;

    composite.launch();
    composite.set_audio_permission(PermissionStatus::Granted);
    composite.set_camera_permission(PermissionStatus::Granted);
    if composite.state().navigation.screen == Screen::Setup {
        composite.join();
    }
    wait_for(&composite, "connection", |s| s.call.status == CallStatus::Connected);
    print_header(&composite);

    let controls = ControlBarViewModel::from_state(&composite.state());
    if let Some(action) = controls.toggle_microphone() {
        composite.dispatch(action);
    }
    composite.dispatch(Action::LocalUser(LocalUserAction::CameraOnRequested));
    wait_for(&composite, "camera", |s| s.local_user.camera.video_stream_id.is_some());

    sdk.emit(SdkEvent::RemoteParticipantsUpdated(vec![
        RemoteParticipant::new("8:acs:1", "Grace"),
        RemoteParticipant::new("8:acs:2", "Linus").muted(true),
    ]));
    print_header(&composite);

    // Speaker works, the headset route fails and falls back, bluetooth is not connected
    for device in [AudioDevice::Speaker, AudioDevice::WiredHeadset, AudioDevice::Bluetooth] {
        composite.dispatch(Action::Audio(AudioAction::DeviceSelectRequested(device)));
        wait_for(&composite, "audio switch", |s| !s.audio.is_switching());
        println!("audio route: {}", composite.state().audio.current);
    }

    focus.notify(FocusChange::LostTransient);
    wait_for(&composite, "hold", |s| s.call.status.is_on_hold());
    print_header(&composite);
    composite.dispatch(Action::Calling(CallingAction::ResumeRequested));
    wait_for(&composite, "resume", |s| s.call.status == CallStatus::Connected);

    sdk.emit(SdkEvent::RemoteParticipantsRemoved(vec!["8:acs:2".to_string()]));
    sdk.emit(SdkEvent::CallStateChanged {
        status: CallStatus::Disconnected,
        end_reason: Some(CallEndReason::new(0, 0)),
    });
    wait_for(&composite, "exit", |s| s.navigation.screen == Screen::Exit);
    composite.dismiss();

    let state = composite.state();
    println!(
        "final state: screen {:?}, call {}, audio {}, {} participant(s), fatal error: {}",
        state.navigation.screen,
        state.call.status,
        state.audio.current,
        state.participants.count(),
        state
            .errors
            .fatal
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    log::info!("Demo finished");
    println!("log written to {}", log_file.display());
    Ok(())
}
