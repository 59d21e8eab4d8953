//! Composite configuration
//!
//! Loaded once from `.calling-composite.toml` and injected into the composite.
//! Feature flags live here instead of in process-wide globals.

use serde::{Deserialize, Serialize};

/// Where the store runs its reductions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DispatchSetting {
    Immediate,
    #[default]
    Threaded,
}

/// How state snapshots are delivered to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmissionSetting {
    Inline,
    Worker,
    #[default]
    Debounced,
}

/// Store settings (`[store]` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub dispatch: DispatchSetting,

    #[serde(default)]
    pub emission: EmissionSetting,

    /// Quiescence window for debounced emission
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    16 // about one frame
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            dispatch: DispatchSetting::default(),
            emission: EmissionSetting::default(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Feature flags (`[features]` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Speak state changes (mute, camera, participants) through the screen reader
    #[serde(default = "enabled")]
    pub accessibility_announcements: bool,

    /// Request exclusive audio focus before starting or resuming a call
    #[serde(default = "enabled")]
    pub audio_focus: bool,

    /// Join the call directly instead of showing the setup screen
    #[serde(default)]
    pub skip_setup_screen: bool,

    /// Route back to the previous audio device when a switch fails
    #[serde(default = "enabled")]
    pub restore_audio_device_on_failure: bool,
}

fn enabled() -> bool {
    true
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            accessibility_announcements: true,
            audio_focus: true,
            skip_setup_screen: false,
            restore_audio_device_on_failure: true,
        }
    }
}

/// Composite configuration loaded from `.calling-composite.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompositeConfig {
    /// Name shown for the local participant
    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub features: FeatureFlags,
}

impl CompositeConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match Self::parse(&content) {
                Ok(config) => {
                    log::info!("Loaded composite config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default composite config");
        Self::default()
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
