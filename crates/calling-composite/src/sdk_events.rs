//! Calling SDK events
//!
//! The SDK reports what it observes through a single callback. Each event
//! maps to exactly one action, dispatched into the store like any other.

use crate::actions::{Action, AudioAction, CallingAction, LocalUserAction, ParticipantAction};
use crate::domain_models::{
    AudioDevice, CallEndReason, CallStatus, NetworkQuality, RemoteParticipant,
};
use crate::platform::SdkEventSink;
use crate::state::AppState;
use composite_store::Dispatcher;
use std::collections::BTreeSet;

/// Raw event pushed by the calling SDK
#[derive(Debug, Clone, PartialEq)]
pub enum SdkEvent {
    CallStateChanged {
        status: CallStatus,
        end_reason: Option<CallEndReason>,
    },
    CallIdChanged(String),
    RemoteParticipantsUpdated(Vec<RemoteParticipant>),
    RemoteParticipantsRemoved(Vec<String>),
    DominantSpeakersChanged(Vec<String>),
    RecordingChanged(bool),
    TranscriptionChanged(bool),
    NetworkQualityChanged(NetworkQuality),
    NetworkAvailabilityChanged(bool),
    SpeakingWhileMuted(bool),
    /// Local microphone muted or unmuted outside our control
    MicrophoneMuteChanged { muted: bool },
    AudioDevicesChanged(BTreeSet<AudioDevice>),
}

impl From<SdkEvent> for Action {
    fn from(event: SdkEvent) -> Self {
        match event {
            SdkEvent::CallStateChanged { status, end_reason } => {
                Action::Calling(CallingAction::StateUpdated { status, end_reason })
            }
            SdkEvent::CallIdChanged(id) => Action::Calling(CallingAction::CallIdUpdated(id)),
            SdkEvent::RemoteParticipantsUpdated(participants) => {
                Action::Participants(ParticipantAction::ParticipantsUpdated(participants))
            }
            SdkEvent::RemoteParticipantsRemoved(ids) => {
                Action::Participants(ParticipantAction::ParticipantsRemoved(ids))
            }
            SdkEvent::DominantSpeakersChanged(ids) => {
                Action::Participants(ParticipantAction::DominantSpeakersUpdated(ids))
            }
            SdkEvent::RecordingChanged(on) => Action::Calling(CallingAction::RecordingUpdated(on)),
            SdkEvent::TranscriptionChanged(on) => {
                Action::Calling(CallingAction::TranscriptionUpdated(on))
            }
            SdkEvent::NetworkQualityChanged(quality) => {
                Action::Calling(CallingAction::NetworkQualityUpdated(quality))
            }
            SdkEvent::NetworkAvailabilityChanged(available) => {
                Action::Calling(CallingAction::NetworkAvailabilityUpdated(available))
            }
            SdkEvent::SpeakingWhileMuted(speaking) => {
                Action::Calling(CallingAction::SpeakingWhileMutedUpdated(speaking))
            }
            SdkEvent::MicrophoneMuteChanged { muted } => {
                Action::LocalUser(LocalUserAction::MicStateSynced { is_on: !muted })
            }
            SdkEvent::AudioDevicesChanged(devices) => {
                Action::Audio(AudioAction::AvailableDevicesUpdated(devices))
            }
        }
    }
}

/// Forwards SDK events into the store
pub struct SdkEventBridge {
    dispatcher: Dispatcher<AppState, Action>,
}

impl SdkEventBridge {
    pub fn new(dispatcher: Dispatcher<AppState, Action>) -> Self {
        Self { dispatcher }
    }

    pub fn forward(&self, event: SdkEvent) {
        log::trace!("SDK event: {:?}", event);
        self.dispatcher.dispatch(Action::from(event));
    }

    /// Callback to hand to `CallingSdk::set_event_sink`
    pub fn into_sink(self) -> SdkEventSink {
        Box::new(move |event| self.forward(event))
    }
}
