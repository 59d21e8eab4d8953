//! Audio focus actions

use crate::platform::FocusChange;

#[derive(Debug, Clone, PartialEq)]
pub enum AudioSessionAction {
    FocusApproved,
    FocusRejected { reason: String },
    /// Out-of-band focus notification from the platform
    FocusChanged(FocusChange),
}
