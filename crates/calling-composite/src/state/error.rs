//! Error State

use crate::errors::CompositeError;

/// Transient, non-fatal failure to surface as a toast/snackbar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub error: CompositeError,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorState {
    /// First fatal error of the session
    pub fatal: Option<CompositeError>,
    /// Why the call ended, when that counts as an error
    pub call_state_error: Option<CompositeError>,
    pub notice: Option<Notice>,
}
