use strum::Display;

/// State of a runtime permission (microphone, camera)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum PermissionStatus {
    #[default]
    Unknown,
    Requesting,
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }
}
