//! Error Info View Model
//!
//! The snackbar shown for transient failures.

use crate::actions::{Action, ErrorAction};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfoViewModel {
    pub is_visible: bool,
    pub code: String,
    pub message: String,
}

impl ErrorInfoViewModel {
    pub fn from_state(state: &AppState) -> Self {
        match &state.errors.notice {
            Some(notice) => Self {
                is_visible: true,
                code: notice.error.code.to_string(),
                message: notice.error.message.clone(),
            },
            None => Self {
                is_visible: false,
                code: String::new(),
                message: String::new(),
            },
        }
    }

    pub fn dismiss(&self) -> Option<Action> {
        self.is_visible
            .then_some(Action::Error(ErrorAction::NoticeDismissed))
    }
}
