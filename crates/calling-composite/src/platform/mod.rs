//! Platform services the composite depends on
//!
//! The calling SDK, audio focus arbitration and audio routing are owned by
//! the host platform. Middleware only sees them through these traits, which
//! makes every side effect replaceable in tests (see `simulated`).

pub mod simulated;

use crate::domain_models::{AudioDevice, CameraFacing};
use crate::sdk_events::SdkEvent;
use async_trait::async_trait;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors reported by platform services
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// The user or the OS refused the request
    #[error("Denied: {0}")]
    Denied(String),

    /// The requested resource does not exist or is not connected
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// The operation was attempted and failed
    #[error("Failed: {0}")]
    Failed(String),

    /// The calling SDK rejected the operation
    #[error("SDK error {code}/{subcode}: {message}")]
    Sdk {
        code: u32,
        subcode: u32,
        message: String,
    },
}

/// Audio focus notification from the OS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    Gained,
    /// Another app took focus for good
    Lost,
    /// Another app took focus for a while (e.g. a phone call)
    LostTransient,
}

/// Callback receiving raw SDK events
pub type SdkEventSink = Box<dyn Fn(SdkEvent) + Send + Sync>;

/// Callback receiving audio focus notifications
pub type FocusListener = Box<dyn Fn(FocusChange) + Send + Sync>;

/// Where to join
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallLocator {
    GroupCall(String),
    Meeting(String),
    Room(String),
}

/// Everything the SDK needs to join a call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub locator: CallLocator,
    pub display_name: String,
    pub microphone_on: bool,
    pub camera_on: bool,
}

/// The calling SDK
///
/// Operations complete asynchronously. State changes the SDK observes on
/// its own (participants joining, call dropped, ...) are pushed through the
/// event sink instead.
#[async_trait]
pub trait CallingSdk: Send + Sync {
    async fn start_call(&self, request: &CallRequest) -> Result<(), PlatformError>;

    async fn end_call(&self) -> Result<(), PlatformError>;

    async fn hold(&self) -> Result<(), PlatformError>;

    async fn resume(&self) -> Result<(), PlatformError>;

    async fn set_microphone(&self, on: bool) -> Result<(), PlatformError>;

    /// Start sending video; returns the local stream id
    async fn turn_camera_on(&self, facing: CameraFacing) -> Result<String, PlatformError>;

    async fn turn_camera_off(&self) -> Result<(), PlatformError>;

    /// Start a local-only preview; returns the local stream id
    async fn start_preview(&self, facing: CameraFacing) -> Result<String, PlatformError>;

    /// Switch to the `to` camera; returns the facing actually in use
    async fn switch_camera(&self, to: CameraFacing) -> Result<CameraFacing, PlatformError>;

    /// Install the callback receiving SDK events; replaces any previous one
    fn set_event_sink(&self, sink: SdkEventSink);
}

/// Exclusive audio focus arbitration
pub trait AudioFocus: Send + Sync {
    /// Ask for focus; answered synchronously by the OS
    fn request_focus(&self) -> Result<(), PlatformError>;

    fn abandon_focus(&self);

    /// Install the callback receiving out-of-band focus changes
    fn set_focus_listener(&self, listener: FocusListener);
}

/// Audio output routing
#[async_trait]
pub trait AudioRouter: Send + Sync {
    async fn route_to(&self, device: AudioDevice) -> Result<(), PlatformError>;

    /// Routes currently available
    fn available_devices(&self) -> BTreeSet<AudioDevice>;
}
