//! Screen reader announcements
//!
//! Announcements are derived by comparing the state before and after a
//! reduction, so they follow what actually changed rather than what was
//! requested.

use crate::actions::Action;
use crate::domain_models::{AudioDevice, CallStatus};
use crate::state::{AppState, CameraOperation, MicOperation};

/// Observes state transitions; plugged into the root reducer
pub trait Announcer: Send {
    fn announce(&self, previous: &AppState, next: &AppState, action: &Action);
}

/// Platform text-to-speech sink
pub trait ScreenReader: Send {
    fn speak(&self, text: &str);
}

impl<R: ScreenReader + ?Sized> ScreenReader for Box<R> {
    fn speak(&self, text: &str) {
        (**self).speak(text)
    }
}

/// Screen reader that writes announcements to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogScreenReader;

impl ScreenReader for LogScreenReader {
    fn speak(&self, text: &str) {
        log::info!("Announce: {}", text);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Announcement {
    CallConnected,
    CallOnHold,
    CallResumed,
    CallEnded,
    RecordingStarted,
    RecordingStopped,
    MicrophoneOn,
    MicrophoneOff,
    CameraOn,
    CameraOff,
    ParticipantJoined(String),
    ParticipantLeft(String),
    AudioRouted(AudioDevice),
    Notice(String),
}

impl std::fmt::Display for Announcement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Announcement::CallConnected => write!(f, "Call connected"),
            Announcement::CallOnHold => write!(f, "Call on hold"),
            Announcement::CallResumed => write!(f, "Call resumed"),
            Announcement::CallEnded => write!(f, "Call ended"),
            Announcement::RecordingStarted => write!(f, "Recording started"),
            Announcement::RecordingStopped => write!(f, "Recording stopped"),
            Announcement::MicrophoneOn => write!(f, "Microphone on"),
            Announcement::MicrophoneOff => write!(f, "Microphone off"),
            Announcement::CameraOn => write!(f, "Camera on"),
            Announcement::CameraOff => write!(f, "Camera off"),
            Announcement::ParticipantJoined(name) => write!(f, "{} joined the call", name),
            Announcement::ParticipantLeft(name) => write!(f, "{} left the call", name),
            Announcement::AudioRouted(device) => write!(f, "Audio switched to {}", device),
            Announcement::Notice(message) => write!(f, "{}", message),
        }
    }
}

/// Everything worth announcing about one transition, in reading order
pub fn announcements(previous: &AppState, next: &AppState) -> Vec<Announcement> {
    let mut out = Vec::new();

    if previous.call.status != next.call.status {
        match next.call.status {
            CallStatus::Connected if previous.call.status.is_on_hold() => {
                out.push(Announcement::CallResumed)
            }
            CallStatus::Connected => out.push(Announcement::CallConnected),
            CallStatus::LocalHold | CallStatus::RemoteHold => out.push(Announcement::CallOnHold),
            CallStatus::Disconnected => out.push(Announcement::CallEnded),
            _ => {}
        }
    }

    if previous.call.is_recording != next.call.is_recording {
        out.push(if next.call.is_recording {
            Announcement::RecordingStarted
        } else {
            Announcement::RecordingStopped
        });
    }

    if previous.local_user.mic != next.local_user.mic {
        match next.local_user.mic {
            MicOperation::On => out.push(Announcement::MicrophoneOn),
            MicOperation::Off => out.push(Announcement::MicrophoneOff),
            MicOperation::Pending => {}
        }
    }

    let camera_before = previous.local_user.camera.operation;
    let camera_after = next.local_user.camera.operation;
    if camera_before != camera_after {
        match camera_after {
            CameraOperation::On => out.push(Announcement::CameraOn),
            CameraOperation::Off if camera_before == CameraOperation::On => {
                out.push(Announcement::CameraOff)
            }
            _ => {}
        }
    }

    if previous.participants.roster_version != next.participants.roster_version {
        for (id, participant) in &next.participants.participants {
            if !previous.participants.participants.contains_key(id) {
                out.push(Announcement::ParticipantJoined(participant.label().to_string()));
            }
        }
        for (id, participant) in &previous.participants.participants {
            if !next.participants.participants.contains_key(id) {
                out.push(Announcement::ParticipantLeft(participant.label().to_string()));
            }
        }
    }

    if previous.audio.current != next.audio.current {
        out.push(Announcement::AudioRouted(next.audio.current));
    }

    if previous.errors.notice != next.errors.notice {
        if let Some(notice) = &next.errors.notice {
            out.push(Announcement::Notice(notice.error.message.clone()));
        }
    }

    out
}

/// Announcer speaking every derived announcement through a screen reader
pub struct AccessibilityAnnouncer<R> {
    reader: R,
}

impl<R: ScreenReader> AccessibilityAnnouncer<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: ScreenReader> Announcer for AccessibilityAnnouncer<R> {
    fn announce(&self, previous: &AppState, next: &AppState, _action: &Action) {
        for announcement in announcements(previous, next) {
            self.reader.speak(&announcement.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{AudioAction, LocalUserAction, ParticipantAction};
    use crate::domain_models::RemoteParticipant;
    use crate::reducers::app_reducer::reduce;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturingReader(Arc<Mutex<Vec<String>>>);

    impl ScreenReader for CapturingReader {
        fn speak(&self, text: &str) {
            self.0.lock().unwrap().push(text.to_string());
        }
    }

    #[test]
    fn test_mute_and_roster_changes_are_announced() {
        let previous = AppState::default();
        let next = reduce(previous.clone(), &Action::LocalUser(LocalUserAction::MicOnSucceeded));
        let next = reduce(
            next,
            &Action::Participants(ParticipantAction::ParticipantsUpdated(vec![
                RemoteParticipant::new("b", "Bob"),
            ])),
        );

        assert_eq!(
            announcements(&previous, &next),
            vec![
                Announcement::MicrophoneOn,
                Announcement::ParticipantJoined("Bob".to_string()),
            ]
        );
    }

    #[test]
    fn test_resume_is_told_apart_from_first_connect() {
        let mut previous = AppState::default();
        previous.call.status = CallStatus::LocalHold;
        let mut next = previous.clone();
        next.call.status = CallStatus::Connected;
        next.call.is_recording = true;

        assert_eq!(
            announcements(&previous, &next),
            vec![Announcement::CallResumed, Announcement::RecordingStarted]
        );
    }

    #[test]
    fn test_pending_states_are_silent() {
        let previous = AppState::default();
        let next = reduce(previous.clone(), &Action::LocalUser(LocalUserAction::MicOnTriggered));
        assert!(announcements(&previous, &next).is_empty());
    }

    #[test]
    fn test_announcer_speaks_through_reader() {
        let reader = CapturingReader::default();
        let announcer = AccessibilityAnnouncer::new(reader.clone());
        let action = Action::Audio(AudioAction::SwitchCompleted {
            device: AudioDevice::Speaker,
        });
        let previous = AppState::default();
        let next = reduce(previous.clone(), &action);

        announcer.announce(&previous, &next, &action);

        assert_eq!(*reader.0.lock().unwrap(), vec!["Audio switched to speaker"]);
    }
}
