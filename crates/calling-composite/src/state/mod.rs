//! Application State Module
//!
//! Contains all state types used by the composite, one module per sub-state.

mod app;
mod audio;
mod audio_session;
mod call;
mod error;
mod lifecycle;
mod local_user;
mod navigation;
mod participants;
mod permission;

pub use app::AppState;
pub use audio::{AudioState, SwitchStatus};
pub use audio_session::{AudioFocusStatus, AudioSessionState};
pub use call::{CallDiagnostics, CallState};
pub use error::{ErrorState, Notice};
pub use lifecycle::{LifecycleState, LifecycleStatus};
pub use local_user::{CameraOperation, CameraState, LocalUserState, MicOperation};
pub use navigation::{NavigationState, Screen};
pub use participants::RemoteParticipantsState;
pub use permission::PermissionState;
