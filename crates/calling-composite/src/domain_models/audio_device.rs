//! Audio output routes

use strum::{Display, EnumIter};

/// An audio route the platform can switch the call to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
pub enum AudioDevice {
    /// Earpiece
    #[strum(serialize = "receiver")]
    Receiver,
    #[strum(serialize = "speaker")]
    Speaker,
    #[strum(serialize = "wired headset")]
    WiredHeadset,
    #[strum(serialize = "bluetooth")]
    Bluetooth,
}

impl AudioDevice {
    /// Routes every device offers without external hardware
    pub fn built_in() -> [AudioDevice; 2] {
        [AudioDevice::Receiver, AudioDevice::Speaker]
    }
}
