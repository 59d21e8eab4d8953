use crate::domain_models::PermissionStatus;

#[derive(Debug, Clone, PartialEq)]
pub enum PermissionAction {
    AudioPermissionRequested,
    AudioPermissionIsSet(PermissionStatus),
    CameraPermissionRequested,
    CameraPermissionIsSet(PermissionStatus),
}
