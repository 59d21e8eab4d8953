use crate::domain_models::PermissionStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PermissionState {
    pub audio: PermissionStatus,
    pub camera: PermissionStatus,
}
