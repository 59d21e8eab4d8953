//! View Models
//!
//! Pre-computed presentation data derived from `AppState`. Views render
//! these and turn user input into actions through their intent methods;
//! they never read or write state directly.

pub mod call_header;
pub mod control_bar;
pub mod error_info;
pub mod participant_grid;

pub use call_header::CallHeaderViewModel;
pub use control_bar::{AudioDeviceOption, ControlBarViewModel};
pub use error_info::ErrorInfoViewModel;
pub use participant_grid::{ParticipantGridViewModel, ParticipantTile};
