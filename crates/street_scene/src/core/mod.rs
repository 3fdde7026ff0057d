//! # Core module
//!
//! Shared configuration types used by every subsystem.

pub mod config;

pub use config::{
    ApplicationConfig,
    EngineConfig,
    SceneConfig,
    ViewConfig,
    LayoutConfig,
    AssetConfig,
    ColorChannel,
    Config,
    ConfigError,
    LAMP_SCALE_CHOICES,
    VELOCITY_CHOICES,
    channel_choices,
};
