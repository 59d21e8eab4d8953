//! In-process platform fakes
//!
//! Used by the demo binary and the tests. Each fake records the calls it
//! receives and can be told to fail specific operations.

use super::{
    AudioFocus, AudioRouter, CallRequest, CallingSdk, FocusChange, FocusListener, PlatformError,
    SdkEventSink,
};
use crate::domain_models::{AudioDevice, CallEndReason, CallStatus, CameraFacing};
use crate::sdk_events::SdkEvent;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// SDK operations that can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SdkOperation {
    StartCall,
    EndCall,
    Hold,
    Resume,
    Microphone,
    CameraOn,
    CameraOff,
    Preview,
    SwitchCamera,
}

/// Calling SDK fake
///
/// With `auto_events` enabled it reports the call state transitions a real
/// SDK would (connecting, connected, disconnected).
pub struct SimulatedCallingSdk {
    sink: Mutex<Option<SdkEventSink>>,
    failing: Mutex<HashSet<SdkOperation>>,
    calls: Mutex<Vec<SdkOperation>>,
    auto_events: AtomicBool,
    latency: Duration,
}

impl Default for SimulatedCallingSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedCallingSdk {
    pub fn new() -> Self {
        Self {
            sink: Mutex::new(None),
            failing: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            auto_events: AtomicBool::new(true),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn set_auto_events(&self, enabled: bool) {
        self.auto_events.store(enabled, Ordering::SeqCst);
    }

    pub fn fail(&self, operation: SdkOperation) {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(operation);
    }

    /// Operations received so far, in order
    pub fn calls(&self) -> Vec<SdkOperation> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn has_sink(&self) -> bool {
        self.sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Push an event as if the SDK observed it
    pub fn emit(&self, event: SdkEvent) {
        let sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        match sink.as_ref() {
            Some(sink) => sink(event),
            None => log::debug!("SimulatedCallingSdk: no sink for {:?}", event),
        }
    }

    async fn invoke(&self, operation: SdkOperation) -> Result<(), PlatformError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(operation);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let failing = self
            .failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&operation);
        if failing {
            return Err(PlatformError::Sdk {
                code: 500,
                subcode: 0,
                message: format!("{:?} failed", operation),
            });
        }
        Ok(())
    }

    fn auto_emit(&self, event: SdkEvent) {
        if self.auto_events.load(Ordering::SeqCst) {
            self.emit(event);
        }
    }
}

#[async_trait]
impl CallingSdk for SimulatedCallingSdk {
    async fn start_call(&self, request: &CallRequest) -> Result<(), PlatformError> {
        self.invoke(SdkOperation::StartCall).await?;
        log::debug!("SimulatedCallingSdk: joining {:?}", request.locator);
        self.auto_emit(SdkEvent::CallStateChanged {
            status: CallStatus::Connecting,
            end_reason: None,
        });
        self.auto_emit(SdkEvent::CallIdChanged("simulated-call".to_string()));
        self.auto_emit(SdkEvent::CallStateChanged {
            status: CallStatus::Connected,
            end_reason: None,
        });
        Ok(())
    }

    async fn end_call(&self) -> Result<(), PlatformError> {
        self.invoke(SdkOperation::EndCall).await?;
        self.auto_emit(SdkEvent::CallStateChanged {
            status: CallStatus::Disconnected,
            end_reason: Some(CallEndReason::new(0, 0)),
        });
        Ok(())
    }

    async fn hold(&self) -> Result<(), PlatformError> {
        self.invoke(SdkOperation::Hold).await?;
        self.auto_emit(SdkEvent::CallStateChanged {
            status: CallStatus::LocalHold,
            end_reason: None,
        });
        Ok(())
    }

    async fn resume(&self) -> Result<(), PlatformError> {
        self.invoke(SdkOperation::Resume).await?;
        self.auto_emit(SdkEvent::CallStateChanged {
            status: CallStatus::Connected,
            end_reason: None,
        });
        Ok(())
    }

    async fn set_microphone(&self, _on: bool) -> Result<(), PlatformError> {
        self.invoke(SdkOperation::Microphone).await
    }

    async fn turn_camera_on(&self, facing: CameraFacing) -> Result<String, PlatformError> {
        self.invoke(SdkOperation::CameraOn).await?;
        Ok(format!("local-{}", facing))
    }

    async fn turn_camera_off(&self) -> Result<(), PlatformError> {
        self.invoke(SdkOperation::CameraOff).await
    }

    async fn start_preview(&self, facing: CameraFacing) -> Result<String, PlatformError> {
        self.invoke(SdkOperation::Preview).await?;
        Ok(format!("preview-{}", facing))
    }

    async fn switch_camera(&self, to: CameraFacing) -> Result<CameraFacing, PlatformError> {
        self.invoke(SdkOperation::SwitchCamera).await?;
        Ok(to)
    }

    fn set_event_sink(&self, sink: SdkEventSink) {
        *self.sink.lock().unwrap_or_else(PoisonError::into_inner) = Some(sink);
    }
}

/// Audio focus fake; grants focus unless told otherwise
pub struct SimulatedAudioFocus {
    granted: AtomicBool,
    requests: AtomicUsize,
    abandons: AtomicUsize,
    listener: Mutex<Option<FocusListener>>,
}

impl Default for SimulatedAudioFocus {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedAudioFocus {
    pub fn new() -> Self {
        Self {
            granted: AtomicBool::new(true),
            requests: AtomicUsize::new(0),
            abandons: AtomicUsize::new(0),
            listener: Mutex::new(None),
        }
    }

    pub fn set_granted(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn abandons(&self) -> usize {
        self.abandons.load(Ordering::SeqCst)
    }

    /// Deliver a focus change as the OS would
    pub fn notify(&self, change: FocusChange) {
        let listener = self.listener.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(listener) = listener.as_ref() {
            listener(change);
        }
    }
}

impl AudioFocus for SimulatedAudioFocus {
    fn request_focus(&self) -> Result<(), PlatformError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.granted.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(PlatformError::Denied(
                "another app holds audio focus".to_string(),
            ))
        }
    }

    fn abandon_focus(&self) {
        self.abandons.fetch_add(1, Ordering::SeqCst);
    }

    fn set_focus_listener(&self, listener: FocusListener) {
        *self.listener.lock().unwrap_or_else(PoisonError::into_inner) = Some(listener);
    }
}

/// Audio router fake
pub struct SimulatedAudioRouter {
    available: Mutex<BTreeSet<AudioDevice>>,
    failing: Mutex<BTreeSet<AudioDevice>>,
    routed: Mutex<Vec<AudioDevice>>,
    latency: Duration,
}

impl Default for SimulatedAudioRouter {
    fn default() -> Self {
        Self::new(AudioDevice::built_in())
    }
}

impl SimulatedAudioRouter {
    pub fn new(available: impl IntoIterator<Item = AudioDevice>) -> Self {
        Self {
            available: Mutex::new(available.into_iter().collect()),
            failing: Mutex::new(BTreeSet::new()),
            routed: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every route attempt to `device` fail
    pub fn fail(&self, device: AudioDevice) {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(device);
    }

    /// Routes applied so far, in order
    pub fn routed(&self) -> Vec<AudioDevice> {
        self.routed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AudioRouter for SimulatedAudioRouter {
    async fn route_to(&self, device: AudioDevice) -> Result<(), PlatformError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let failing = self
            .failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&device);
        if failing {
            return Err(PlatformError::Failed(format!("could not route to {}", device)));
        }
        if !self.available_devices().contains(&device) {
            return Err(PlatformError::Unavailable(device.to_string()));
        }
        self.routed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(device);
        Ok(())
    }

    fn available_devices(&self) -> BTreeSet<AudioDevice> {
        self.available
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
