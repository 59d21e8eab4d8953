//! Configuration for the calling composite
//!
//! This crate provides:
//! - File path utilities for config and cache files
//! - Configuration file discovery (TOML)
//! - Composite configuration (`CompositeConfig`) with store settings and feature flags

pub mod composite_config;
pub mod config_file;
pub mod paths;

pub use composite_config::{
    CompositeConfig, DispatchSetting, EmissionSetting, FeatureFlags, StoreSettings,
};
pub use config_file::load_config_file;
pub use paths::{app_config_path, cache_dir, config_dir};
