//! Call lifecycle actions

use crate::domain_models::{CallEndReason, CallStatus, NetworkQuality};

#[derive(Debug, Clone, PartialEq)]
pub enum CallingAction {
    /// User asked to join the call
    CallStartRequested,
    /// User asked to hang up
    CallEndRequested,
    HoldRequested,
    ResumeRequested,
    /// The SDK reported a call state transition
    StateUpdated {
        status: CallStatus,
        end_reason: Option<CallEndReason>,
    },
    CallIdUpdated(String),
    RecordingUpdated(bool),
    TranscriptionUpdated(bool),
    NetworkQualityUpdated(NetworkQuality),
    NetworkAvailabilityUpdated(bool),
    SpeakingWhileMutedUpdated(bool),
}
