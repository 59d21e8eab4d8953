//! Actions module
//!
//! Every state change starts as an `Action`: a user intent coming from a view
//! model, an event reported by the calling SDK or a platform service, or a
//! follow-up dispatched by middleware. Actions are tagged by the sub-state
//! they are about, carry only the data needed to compute the next state and
//! never carry behavior.

pub mod audio;
pub mod audio_session;
pub mod calling;
pub mod error;
pub mod lifecycle;
pub mod local_user;
pub mod navigation;
pub mod participants;
pub mod permission;

pub use audio::AudioAction;
pub use audio_session::AudioSessionAction;
pub use calling::CallingAction;
pub use error::ErrorAction;
pub use lifecycle::LifecycleAction;
pub use local_user::LocalUserAction;
pub use navigation::NavigationAction;
pub use participants::ParticipantAction;
pub use permission::PermissionAction;

/// Root action enum - tagged by domain
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Call lifecycle and call-wide flags
    Calling(CallingAction),
    /// Local microphone and camera
    LocalUser(LocalUserAction),
    /// Remote participant roster
    Participants(ParticipantAction),
    /// Runtime permissions
    Permission(PermissionAction),
    /// Audio output routing
    Audio(AudioAction),
    /// Audio focus arbitration
    AudioSession(AudioSessionAction),
    /// Error reporting and emergency exit
    Error(ErrorAction),
    /// Screen navigation
    Navigation(NavigationAction),
    /// Host application foreground/background
    Lifecycle(LifecycleAction),
}
