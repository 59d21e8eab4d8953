#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioFocusStatus {
    #[default]
    Unrequested,
    Approved,
    Rejected,
    /// Focus taken away by another app (e.g. an incoming phone call)
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AudioSessionState {
    pub focus: AudioFocusStatus,
}
