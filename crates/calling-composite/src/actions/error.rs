use crate::errors::CompositeError;

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorAction {
    /// An SDK operation failed; fatal codes end the session
    ErrorOccurred(CompositeError),
    /// The call ended for a reason classified as an error
    CallStateErrorOccurred(CompositeError),
    /// The UI consumed the transient notice (toast/snackbar)
    NoticeDismissed,
    /// Tear the session down immediately
    EmergencyExit,
}
