//! Domain models
//!
//! Core calling types shared by actions, state and platform services.
//! These are pure domain concepts, separate from UI state.

pub mod audio_device;
pub mod call_status;
pub mod camera;
pub mod network;
pub mod participant;
pub mod permission;

pub use audio_device::AudioDevice;
pub use call_status::{CallEndReason, CallStatus};
pub use camera::CameraFacing;
pub use network::NetworkQuality;
pub use participant::RemoteParticipant;
pub use permission::PermissionStatus;
