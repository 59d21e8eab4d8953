//! Call Action Middleware
//!
//! Bridges calling intents to the SDK. Every SDK operation runs on the
//! runtime and reports its outcome back as an action; the intent itself is
//! always forwarded so the reducers can show the pending state.

use super::{AppNext, AppStore};
use crate::actions::{
    Action, CallingAction, ErrorAction, LifecycleAction, LocalUserAction, NavigationAction,
    PermissionAction,
};
use crate::domain_models::{CallStatus, PermissionStatus};
use crate::errors::{CompositeError, ErrorCode};
use crate::platform::{CallLocator, CallRequest, CallingSdk};
use crate::sdk_events::SdkEventBridge;
use crate::state::{AppState, CameraOperation, MicOperation};
use composite_store::{Dispatcher, Middleware};
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;

const SDK_PANICKED: &str = "calling SDK panicked";

pub struct CallActionMiddleware {
    sdk: Arc<dyn CallingSdk>,
    runtime: Handle,
    locator: CallLocator,
}

impl CallActionMiddleware {
    pub fn new(sdk: Arc<dyn CallingSdk>, runtime: Handle, locator: CallLocator) -> Self {
        Self {
            sdk,
            runtime,
            locator,
        }
    }

    /// Run an SDK operation on the runtime with its own SDK and dispatcher handles
    ///
    /// The operation runs in a task of its own; if it panics, `on_panic` is
    /// dispatched in place of the outcome it never reported.
    fn spawn<F, Fut>(&self, store: &AppStore, on_panic: Option<Action>, task: F)
    where
        F: FnOnce(Arc<dyn CallingSdk>, Dispatcher<AppState, Action>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let dispatcher = store.dispatcher();
        let operation = task(Arc::clone(&self.sdk), dispatcher.clone());
        self.runtime.spawn(async move {
            if let Err(e) = tokio::spawn(operation).await {
                log::error!("CallActionMiddleware: SDK operation aborted: {}", e);
                if let Some(action) = on_panic {
                    dispatcher.dispatch(action);
                }
            }
        });
    }

    fn start_call(&self, state: &AppState, store: &AppStore) {
        let request = CallRequest {
            locator: self.locator.clone(),
            display_name: state.local_user.display_name.clone(),
            microphone_on: state.local_user.mic == MicOperation::On,
            camera_on: state.local_user.camera.operation == CameraOperation::On,
        };
        let on_panic = error(ErrorCode::CallJoinFailed, SDK_PANICKED);
        self.spawn(store, Some(on_panic), |sdk, dispatcher| async move {
            if let Err(e) = sdk.start_call(&request).await {
                log::error!("CallActionMiddleware: failed to join call: {}", e);
                dispatcher.dispatch(error(ErrorCode::CallJoinFailed, e));
            }
        });
    }

    fn set_microphone(&self, on: bool, state: &AppState, store: &AppStore) {
        // Before joining the choice is only a preference carried into the call request
        if !state.call.status.is_established() {
            let action = if on {
                LocalUserAction::MicOnSucceeded
            } else {
                LocalUserAction::MicOffSucceeded
            };
            store.dispatch(Action::LocalUser(action));
            return;
        }

        let reason = SDK_PANICKED.to_string();
        let on_panic = if on {
            LocalUserAction::MicOnFailed { reason }
        } else {
            LocalUserAction::MicOffFailed { reason }
        };
        self.spawn(store, Some(Action::LocalUser(on_panic)), |sdk, dispatcher| async move {
            let action = match (on, sdk.set_microphone(on).await) {
                (true, Ok(())) => LocalUserAction::MicOnSucceeded,
                (false, Ok(())) => LocalUserAction::MicOffSucceeded,
                (true, Err(e)) => LocalUserAction::MicOnFailed {
                    reason: e.to_string(),
                },
                (false, Err(e)) => LocalUserAction::MicOffFailed {
                    reason: e.to_string(),
                },
            };
            dispatcher.dispatch(Action::LocalUser(action));
        });
    }

    /// Start capturing: video into the call when established, a preview otherwise
    fn turn_camera_on(&self, state: &AppState, store: &AppStore) {
        let facing = state.local_user.camera.facing;
        let in_call = state.call.status.is_established();
        self.spawn(store, Some(camera_on_failed()), |sdk, dispatcher| async move {
            let outcome = if in_call {
                sdk.turn_camera_on(facing)
                    .await
                    .map(|stream_id| LocalUserAction::CameraOnSucceeded { stream_id })
            } else {
                sdk.start_preview(facing)
                    .await
                    .map(|stream_id| LocalUserAction::CameraPreviewOnSucceeded { stream_id })
            };
            let action = outcome.unwrap_or_else(|e| LocalUserAction::CameraOnFailed {
                reason: e.to_string(),
            });
            dispatcher.dispatch(Action::LocalUser(action));
        });
    }

    fn handle_calling(&self, action: &CallingAction, state: &AppState, store: &AppStore) {
        match action {
            CallingAction::CallStartRequested => self.start_call(state, store),
            CallingAction::CallEndRequested => {
                let on_panic = error(ErrorCode::CallEndFailed, SDK_PANICKED);
                self.spawn(store, Some(on_panic), |sdk, dispatcher| async move {
                    if let Err(e) = sdk.end_call().await {
                        log::error!("CallActionMiddleware: failed to end call: {}", e);
                        dispatcher.dispatch(error(ErrorCode::CallEndFailed, e));
                    }
                });
            }
            CallingAction::HoldRequested if state.call.status == CallStatus::Connected => {
                let on_panic = error(ErrorCode::HoldFailed, SDK_PANICKED);
                self.spawn(store, Some(on_panic), |sdk, dispatcher| async move {
                    if let Err(e) = sdk.hold().await {
                        dispatcher.dispatch(error(ErrorCode::HoldFailed, e));
                    }
                });
            }
            CallingAction::ResumeRequested if state.call.status == CallStatus::LocalHold => {
                let on_panic = error(ErrorCode::ResumeFailed, SDK_PANICKED);
                self.spawn(store, Some(on_panic), |sdk, dispatcher| async move {
                    if let Err(e) = sdk.resume().await {
                        dispatcher.dispatch(error(ErrorCode::ResumeFailed, e));
                    }
                });
            }
            CallingAction::HoldRequested | CallingAction::ResumeRequested => {
                log::debug!(
                    "CallActionMiddleware: ignoring {:?} while {}",
                    action,
                    state.call.status
                );
            }
            CallingAction::StateUpdated {
                status: CallStatus::Disconnected,
                ..
            } => {
                store.dispatch(Action::Navigation(NavigationAction::Exit));
            }
            _ => {}
        }
    }

    fn handle_local_user(&self, action: &LocalUserAction, state: &AppState, store: &AppStore) {
        match action {
            LocalUserAction::MicOnTriggered => self.set_microphone(true, state, store),
            LocalUserAction::MicOffTriggered => self.set_microphone(false, state, store),
            LocalUserAction::CameraOnRequested => {
                if state.permissions.camera.is_granted() {
                    self.turn_camera_on(state, store);
                } else {
                    // Stays pending until the permission answer arrives
                    store.dispatch(Action::Permission(PermissionAction::CameraPermissionRequested));
                }
            }
            LocalUserAction::CameraPreviewOnRequested => {
                let facing = state.local_user.camera.facing;
                self.spawn(store, Some(camera_on_failed()), |sdk, dispatcher| async move {
                    let action = match sdk.start_preview(facing).await {
                        Ok(stream_id) => LocalUserAction::CameraPreviewOnSucceeded { stream_id },
                        Err(e) => LocalUserAction::CameraOnFailed {
                            reason: e.to_string(),
                        },
                    };
                    dispatcher.dispatch(Action::LocalUser(action));
                });
            }
            LocalUserAction::CameraOffTriggered => {
                let on_panic = Action::LocalUser(LocalUserAction::CameraOffFailed {
                    reason: SDK_PANICKED.to_string(),
                });
                self.spawn(store, Some(on_panic), |sdk, dispatcher| async move {
                    let action = match sdk.turn_camera_off().await {
                        Ok(()) => LocalUserAction::CameraOffSucceeded,
                        Err(e) => LocalUserAction::CameraOffFailed {
                            reason: e.to_string(),
                        },
                    };
                    dispatcher.dispatch(Action::LocalUser(action));
                });
            }
            LocalUserAction::CameraSwitchTriggered => {
                let previous = state.local_user.camera.facing;
                let on_panic = Action::LocalUser(LocalUserAction::CameraSwitchFailed {
                    previous,
                    reason: SDK_PANICKED.to_string(),
                });
                self.spawn(store, Some(on_panic), |sdk, dispatcher| async move {
                    let action = match sdk.switch_camera(previous.flipped()).await {
                        Ok(facing) => LocalUserAction::CameraSwitchSucceeded(facing),
                        Err(e) => LocalUserAction::CameraSwitchFailed {
                            previous,
                            reason: e.to_string(),
                        },
                    };
                    dispatcher.dispatch(Action::LocalUser(action));
                });
            }
            _ => {}
        }
    }

    fn handle_lifecycle(&self, action: &LifecycleAction, state: &AppState, store: &AppStore) {
        let camera = state.local_user.camera.operation;
        match action {
            LifecycleAction::EnterBackgroundTriggered if camera == CameraOperation::On => {
                // A failed pause leaves the camera running
                self.spawn(store, None, |sdk, dispatcher| async move {
                    match sdk.turn_camera_off().await {
                        Ok(()) => {
                            dispatcher.dispatch(Action::LocalUser(LocalUserAction::CameraPauseSucceeded))
                        }
                        Err(e) => log::warn!("CallActionMiddleware: could not pause camera: {}", e),
                    }
                });
            }
            LifecycleAction::EnterForegroundTriggered if camera == CameraOperation::Paused => {
                self.turn_camera_on(state, store);
            }
            _ => {}
        }
    }
}

fn camera_on_failed() -> Action {
    Action::LocalUser(LocalUserAction::CameraOnFailed {
        reason: SDK_PANICKED.to_string(),
    })
}

fn error(code: ErrorCode, cause: impl std::fmt::Display) -> Action {
    Action::Error(ErrorAction::ErrorOccurred(CompositeError::new(
        code,
        cause.to_string(),
    )))
}

impl Middleware<AppState, Action> for CallActionMiddleware {
    fn attach(&mut self, store: &AppStore) {
        self.sdk
            .set_event_sink(SdkEventBridge::new(store.dispatcher()).into_sink());
    }

    fn handle(&mut self, action: Action, store: &AppStore, next: &mut AppNext<'_>) {
        // Decisions are taken on the state the intent was issued against
        let before = store.state();

        match &action {
            Action::Calling(calling) => self.handle_calling(calling, &before, store),
            Action::LocalUser(local_user) => self.handle_local_user(local_user, &before, store),
            Action::Lifecycle(lifecycle) => self.handle_lifecycle(lifecycle, &before, store),
            Action::Error(ErrorAction::EmergencyExit) => {
                if !before.call.status.is_ended() && before.call.status != CallStatus::None {
                    self.spawn(store, None, |sdk, _| async move {
                        if let Err(e) = sdk.end_call().await {
                            log::warn!("CallActionMiddleware: emergency hang up failed: {}", e);
                        }
                    });
                }
            }
            Action::Permission(PermissionAction::AudioPermissionIsSet(PermissionStatus::Denied)) => {
                store.dispatch(error(
                    ErrorCode::MicrophonePermissionDenied,
                    "Microphone permission denied",
                ));
            }
            _ => {}
        }

        let granted_camera = matches!(
            action,
            Action::Permission(PermissionAction::CameraPermissionIsSet(PermissionStatus::Granted))
        );
        next.run(action);

        // A camera waiting on permission turns on once it is granted
        if granted_camera {
            let after = store.state();
            if after.local_user.camera.operation == CameraOperation::Pending {
                self.turn_camera_on(&after, store);
            }
        }
    }
}
