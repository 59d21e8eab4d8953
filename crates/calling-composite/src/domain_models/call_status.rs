//! Call status as reported by the calling SDK

use strum::Display;

/// Lifecycle of the call as seen by the local participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum CallStatus {
    #[default]
    None,
    Connecting,
    Ringing,
    EarlyMedia,
    Connected,
    LocalHold,
    RemoteHold,
    InLobby,
    Disconnecting,
    Disconnected,
}

impl CallStatus {
    /// Media is flowing or paused by a hold; the call is established
    pub fn is_established(self) -> bool {
        matches!(
            self,
            CallStatus::Connected | CallStatus::LocalHold | CallStatus::RemoteHold
        )
    }

    pub fn is_on_hold(self) -> bool {
        matches!(self, CallStatus::LocalHold | CallStatus::RemoteHold)
    }

    pub fn is_ended(self) -> bool {
        matches!(self, CallStatus::Disconnecting | CallStatus::Disconnected)
    }
}

/// Raw reason attached to a call that ended, as `(code, subcode)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CallEndReason {
    pub code: u32,
    pub subcode: u32,
}

impl CallEndReason {
    pub fn new(code: u32, subcode: u32) -> Self {
        Self { code, subcode }
    }
}
