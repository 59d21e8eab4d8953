//! Audio Focus Middleware
//!
//! Gates call start and resume on exclusive audio focus and puts the call on
//! hold when another app takes focus away.

use super::{AppNext, AppStore};
use crate::actions::{Action, AudioSessionAction, CallingAction, ErrorAction};
use crate::domain_models::CallStatus;
use crate::platform::{AudioFocus, FocusChange};
use crate::state::AppState;
use composite_store::Middleware;
use std::sync::Arc;

pub struct AudioFocusMiddleware {
    focus: Arc<dyn AudioFocus>,
    enabled: bool,
    /// Focus was granted and not abandoned since
    holding: bool,
}

impl AudioFocusMiddleware {
    pub fn new(focus: Arc<dyn AudioFocus>, enabled: bool) -> Self {
        Self {
            focus,
            enabled,
            holding: false,
        }
    }

    fn abandon(&mut self) {
        if self.holding {
            log::debug!("AudioFocusMiddleware: abandoning audio focus");
            self.focus.abandon_focus();
            self.holding = false;
        }
    }
}

impl Middleware<AppState, Action> for AudioFocusMiddleware {
    fn attach(&mut self, store: &AppStore) {
        if !self.enabled {
            return;
        }
        let dispatcher = store.dispatcher();
        self.focus.set_focus_listener(Box::new(move |change| {
            dispatcher.dispatch(Action::AudioSession(AudioSessionAction::FocusChanged(change)));
        }));
    }

    fn handle(&mut self, action: Action, store: &AppStore, next: &mut AppNext<'_>) {
        if !self.enabled {
            next.run(action);
            return;
        }

        match &action {
            Action::Calling(CallingAction::CallStartRequested | CallingAction::ResumeRequested) => {
                match self.focus.request_focus() {
                    Ok(()) => {
                        self.holding = true;
                        next.run(Action::AudioSession(AudioSessionAction::FocusApproved));
                        next.run(action);
                    }
                    Err(e) => {
                        log::warn!("AudioFocusMiddleware: focus rejected for {:?}: {}", action, e);
                        next.run(Action::AudioSession(AudioSessionAction::FocusRejected {
                            reason: e.to_string(),
                        }));
                    }
                }
            }
            Action::AudioSession(AudioSessionAction::FocusChanged(
                FocusChange::Lost | FocusChange::LostTransient,
            )) => {
                let connected = store.state().call.status == CallStatus::Connected;
                next.run(action);
                if connected {
                    log::info!("AudioFocusMiddleware: focus lost, holding call");
                    store.dispatch(Action::Calling(CallingAction::HoldRequested));
                }
            }
            Action::Calling(CallingAction::CallEndRequested)
            | Action::Error(ErrorAction::EmergencyExit)
            | Action::Calling(CallingAction::StateUpdated {
                status: CallStatus::Disconnected,
                ..
            }) => {
                self.abandon();
                next.run(action);
            }
            _ => next.run(action),
        }
    }
}
