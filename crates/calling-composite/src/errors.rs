//! Error taxonomy
//!
//! One closed set of error codes covers both platform-capability failures
//! (device switch failed, camera failed, ...) and SDK/call-state failures.
//! Raw SDK end reasons are mapped into it by `classify_call_end`.

use crate::domain_models::CallEndReason;
use strum::{AsRefStr, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCode {
    CallJoinFailed,
    CallEndFailed,
    CallEndedAbnormally,
    TokenExpired,
    CallEvicted,
    CallDeclined,
    NetworkUnavailable,
    MicrophonePermissionDenied,
    MicrophoneFailed,
    CameraFailed,
    SwitchCameraFailed,
    HoldFailed,
    ResumeFailed,
    AudioFocusDenied,
    AudioDeviceSwitchFailed,
}

impl ErrorCode {
    /// Fatal errors end the session (navigate to exit)
    pub fn is_fatal(self) -> bool {
        match self {
            ErrorCode::CallJoinFailed
            | ErrorCode::CallEndedAbnormally
            | ErrorCode::TokenExpired
            | ErrorCode::CallEvicted
            | ErrorCode::CallDeclined
            | ErrorCode::MicrophonePermissionDenied => true,
            ErrorCode::CallEndFailed
            | ErrorCode::NetworkUnavailable
            | ErrorCode::MicrophoneFailed
            | ErrorCode::CameraFailed
            | ErrorCode::SwitchCameraFailed
            | ErrorCode::HoldFailed
            | ErrorCode::ResumeFailed
            | ErrorCode::AudioFocusDenied
            | ErrorCode::AudioDeviceSwitchFailed => false,
        }
    }

    /// Errors after which the session must be torn down right away
    pub fn requires_emergency_exit(self) -> bool {
        self == ErrorCode::TokenExpired
    }
}

/// An error surfaced to state and to the host
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeError {
    pub code: ErrorCode,
    pub message: String,
}

impl CompositeError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CompositeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Map the SDK's end reason of a call to an error code
///
/// Returns `None` for regular hang-ups. `was_connected` tells a call that
/// never got established (join failure) apart from one that dropped.
pub fn classify_call_end(reason: CallEndReason, was_connected: bool) -> Option<ErrorCode> {
    match (reason.code, reason.subcode) {
        (0, 0) | (487, _) => None,
        (401, _) => Some(ErrorCode::TokenExpired),
        (603, _) => Some(ErrorCode::CallDeclined),
        (0, 5000) | (0, 5300) | (410, 5300) => Some(ErrorCode::CallEvicted),
        (408 | 480 | 503, _) => Some(ErrorCode::NetworkUnavailable),
        _ if was_connected => Some(ErrorCode::CallEndedAbnormally),
        _ => Some(ErrorCode::CallJoinFailed),
    }
}
