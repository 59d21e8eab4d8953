//! Call Header View Model
//!
//! Status line at the top of the call screen.

use crate::domain_models::{CallStatus, NetworkQuality};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallHeaderViewModel {
    pub title: String,
    pub participant_count: usize,
    pub is_recording: bool,
    pub is_transcribing: bool,
    /// Warning to show next to the title, if any
    pub warning: Option<&'static str>,
}

impl CallHeaderViewModel {
    pub fn from_state(state: &AppState) -> Self {
        let call = &state.call;
        let title = match call.status {
            CallStatus::None => "Ready to join",
            CallStatus::Connecting | CallStatus::Ringing | CallStatus::EarlyMedia => "Connecting…",
            CallStatus::Connected => "In call",
            CallStatus::LocalHold => "On hold",
            CallStatus::RemoteHold => "Put on hold",
            CallStatus::InLobby => "Waiting in lobby",
            CallStatus::Disconnecting | CallStatus::Disconnected => "Call ended",
        };

        let diagnostics = &call.diagnostics;
        let warning = if !diagnostics.network_available {
            Some("No network connection")
        } else if diagnostics.speaking_while_muted {
            Some("You're muted")
        } else if diagnostics.network_quality == Some(NetworkQuality::Bad) {
            Some("Poor network quality")
        } else {
            None
        };

        Self {
            title: title.to_string(),
            // Local user included
            participant_count: state.participants.count() + 1,
            is_recording: call.is_recording,
            is_transcribing: call.is_transcribing,
            warning,
        }
    }
}
