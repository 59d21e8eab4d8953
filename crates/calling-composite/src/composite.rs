//! Call Composite
//!
//! Entry point for host applications. Wires the store, the middleware chain
//! and the platform services together according to `CompositeConfig`, and
//! owns the runtime every asynchronous platform call runs on.

use crate::accessibility::{AccessibilityAnnouncer, LogScreenReader, ScreenReader};
use crate::actions::{
    Action, CallingAction, LifecycleAction, NavigationAction, PermissionAction,
};
use crate::domain_models::{CallStatus, PermissionStatus};
use crate::handlers::{CompositeEventHandlers, HostEventListener};
use crate::middleware::{
    AudioDeviceMiddleware, AudioFocusMiddleware, CallActionMiddleware, ErrorMiddleware,
};
use crate::platform::{AudioFocus, AudioRouter, CallLocator, CallingSdk};
use crate::reducers::AppStateReducer;
use crate::state::AppState;
use anyhow::{Context, Result};
use composite_config::{CompositeConfig, DispatchSetting, EmissionSetting, StoreSettings};
use composite_store::{
    DispatchMode, Emission, Listener, ListenerId, LoggingMiddleware, Store,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

/// How long `dismiss` waits for the SDK to hang up
const HANG_UP_TIMEOUT: Duration = Duration::from_secs(2);

/// Map configured store settings to store options
pub fn store_options(settings: &StoreSettings) -> (DispatchMode, Emission) {
    let mode = match settings.dispatch {
        DispatchSetting::Immediate => DispatchMode::Immediate,
        DispatchSetting::Threaded => DispatchMode::Threaded,
    };
    let emission = match settings.emission {
        EmissionSetting::Inline => Emission::Inline,
        EmissionSetting::Worker => Emission::Worker,
        EmissionSetting::Debounced => {
            Emission::Debounced(Duration::from_millis(settings.debounce_ms))
        }
    };
    (mode, emission)
}

/// Builder for a `CallComposite`
pub struct CallCompositeBuilder {
    sdk: Arc<dyn CallingSdk>,
    focus: Arc<dyn AudioFocus>,
    router: Arc<dyn AudioRouter>,
    locator: CallLocator,
    config: CompositeConfig,
    handlers: CompositeEventHandlers,
    screen_reader: Option<Box<dyn ScreenReader>>,
}

impl CallCompositeBuilder {
    pub fn config(mut self, config: CompositeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn handlers(mut self, handlers: CompositeEventHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    /// Screen reader used for announcements (defaults to the log)
    pub fn screen_reader(mut self, reader: impl ScreenReader + 'static) -> Self {
        self.screen_reader = Some(Box::new(reader));
        self
    }

    pub fn build(self) -> Result<CallComposite> {
        let CallCompositeBuilder {
            sdk,
            focus,
            router,
            locator,
            config,
            handlers,
            screen_reader,
        } = self;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("composite-runtime")
            .enable_all()
            .build()
            .context("Failed to create tokio runtime")?;

        let reducer = if config.features.accessibility_announcements {
            let reader = screen_reader
                .unwrap_or_else(|| Box::new(LogScreenReader) as Box<dyn ScreenReader>);
            AppStateReducer::with_announcer(Box::new(AccessibilityAnnouncer::new(reader)))
        } else {
            AppStateReducer::new()
        };

        let (mode, emission) = store_options(&config.store);
        let features = &config.features;

        // Middleware executes in the order added
        let store = Store::builder(AppState::for_user(config.display_name.clone()), reducer)
            .middleware(LoggingMiddleware::new())
            .middleware(ErrorMiddleware::new())
            .middleware(AudioFocusMiddleware::new(focus, features.audio_focus))
            .middleware(AudioDeviceMiddleware::new(
                router,
                runtime.handle().clone(),
                features.restore_audio_device_on_failure,
            ))
            .middleware(CallActionMiddleware::new(
                Arc::clone(&sdk),
                runtime.handle().clone(),
                locator,
            ))
            .mode(mode)
            .emission(emission)
            .build()
            .context("Failed to build composite store")?;

        let host_listener = (!handlers.is_empty()).then(|| {
            let listener = Arc::new(HostEventListener::new(handlers, store.current_state()));
            let observer = Arc::clone(&listener);
            let id = store.add_listener(move |state: Arc<AppState>| observer.on_state_changed(state));
            (id, listener)
        });

        log::info!("CallComposite created ({:?}, {:?})", mode, emission);
        Ok(CallComposite {
            store,
            runtime,
            sdk,
            config,
            host_listener,
        })
    }
}

/// A calling session: one store, one call
pub struct CallComposite {
    // Dropped first so no middleware outlives the runtime it spawns on
    store: Store<AppState, Action>,
    runtime: Runtime,
    sdk: Arc<dyn CallingSdk>,
    config: CompositeConfig,
    host_listener: Option<(ListenerId, Arc<HostEventListener>)>,
}

impl CallComposite {
    pub fn builder(
        sdk: Arc<dyn CallingSdk>,
        focus: Arc<dyn AudioFocus>,
        router: Arc<dyn AudioRouter>,
        locator: CallLocator,
    ) -> CallCompositeBuilder {
        CallCompositeBuilder {
            sdk,
            focus,
            router,
            locator,
            config: CompositeConfig::default(),
            handlers: CompositeEventHandlers::default(),
            screen_reader: None,
        }
    }

    pub fn config(&self) -> &CompositeConfig {
        &self.config
    }

    /// Show the setup screen, or join right away when setup is skipped
    pub fn launch(&self) {
        if self.config.features.skip_setup_screen {
            self.dispatch(Action::Navigation(NavigationAction::CallLaunched));
            self.join();
        } else {
            self.dispatch(Action::Navigation(NavigationAction::SetupLaunched));
        }
    }

    pub fn join(&self) {
        self.dispatch(Action::Calling(CallingAction::CallStartRequested));
    }

    pub fn hang_up(&self) {
        self.dispatch(Action::Calling(CallingAction::CallEndRequested));
    }

    /// Report the outcome of the host's microphone permission prompt
    pub fn set_audio_permission(&self, status: PermissionStatus) {
        self.dispatch(Action::Permission(PermissionAction::AudioPermissionIsSet(status)));
    }

    /// Report the outcome of the host's camera permission prompt
    pub fn set_camera_permission(&self, status: PermissionStatus) {
        self.dispatch(Action::Permission(PermissionAction::CameraPermissionIsSet(status)));
    }

    pub fn enter_background(&self) {
        self.dispatch(Action::Lifecycle(LifecycleAction::EnterBackgroundTriggered));
    }

    pub fn enter_foreground(&self) {
        self.dispatch(Action::Lifecycle(LifecycleAction::EnterForegroundTriggered));
    }

    pub fn dispatch(&self, action: Action) {
        self.store.dispatch(action);
    }

    /// Latest reduced state
    pub fn state(&self) -> Arc<AppState> {
        self.store.current_state()
    }

    pub fn add_listener(&self, listener: impl Listener<AppState> + 'static) -> ListenerId {
        self.store.add_listener(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.store.remove_listener(id)
    }

    pub fn is_ended(&self) -> bool {
        self.store.is_ended()
    }

    /// Hang up (best effort) and end the session
    ///
    /// The host's `on_exit` handlers fire before the store ends.
    pub fn dismiss(&self) {
        if self.is_ended() {
            return;
        }
        self.dispatch(Action::Navigation(NavigationAction::Exit));
        let status = self.state().call.status;
        if status != CallStatus::None && !status.is_ended() {
            let sdk = Arc::clone(&self.sdk);
            if tokio::runtime::Handle::try_current().is_ok() {
                // Called from inside the runtime; blocking here would deadlock it
                self.runtime.spawn(async move {
                    if let Err(e) = sdk.end_call().await {
                        log::warn!("CallComposite: hang up on dismiss failed: {}", e);
                    }
                });
                self.end();
                return;
            }
            let outcome = self.runtime.block_on(async move {
                tokio::time::timeout(HANG_UP_TIMEOUT, sdk.end_call()).await
            });
            match outcome {
                Ok(Ok(())) => log::info!("CallComposite: hung up on dismiss"),
                Ok(Err(e)) => log::warn!("CallComposite: hang up on dismiss failed: {}", e),
                Err(_) => log::warn!("CallComposite: hang up on dismiss timed out"),
            }
        }
        self.end();
    }

    /// Terminate the store; later dispatches are ignored. Idempotent.
    ///
    /// A host that has not observed the exit yet receives `on_exit` here.
    pub fn end(&self) {
        if let Some((id, listener)) = &self.host_listener {
            self.store.remove_listener(*id);
            listener.close();
        }
        self.store.end();
    }
}

impl Drop for CallComposite {
    fn drop(&mut self) {
        self.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_options_follow_settings() {
        let settings = StoreSettings {
            dispatch: DispatchSetting::Immediate,
            emission: EmissionSetting::Debounced,
            debounce_ms: 40,
        };
        assert_eq!(
            store_options(&settings),
            (
                DispatchMode::Immediate,
                Emission::Debounced(Duration::from_millis(40))
            )
        );
        assert_eq!(
            store_options(&StoreSettings::default()),
            (
                DispatchMode::Threaded,
                Emission::Debounced(Duration::from_millis(16))
            )
        );
    }
}
