//! Reducers
//!
//! One pure reducer per sub-state. `app_reducer` fans every action out to all
//! of them and reassembles the composite state.

pub mod app_reducer;
pub mod audio_reducer;
pub mod audio_session_reducer;
pub mod call_reducer;
pub mod error_reducer;
pub mod lifecycle_reducer;
pub mod local_user_reducer;
pub mod navigation_reducer;
pub mod participants_reducer;
pub mod permission_reducer;

pub use app_reducer::AppStateReducer;
