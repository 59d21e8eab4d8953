//! Call State

use crate::domain_models::{CallStatus, NetworkQuality};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallState {
    pub status: CallStatus,
    pub call_id: Option<String>,
    /// The user asked to join; cleared once the call ends
    pub join_requested: bool,
    /// The call reached `Connected` at least once
    pub was_connected: bool,
    pub is_recording: bool,
    pub is_transcribing: bool,
    pub diagnostics: CallDiagnostics,
}

/// Network and media diagnostics reported during the call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallDiagnostics {
    pub network_quality: Option<NetworkQuality>,
    pub network_available: bool,
    pub speaking_while_muted: bool,
}

impl Default for CallDiagnostics {
    fn default() -> Self {
        Self {
            network_quality: None,
            network_available: true,
            speaking_while_muted: false,
        }
    }
}
