//! # Application configuration
//!
//! All tunables of the street scene in one serde tree. The runtime-adjustable
//! part ([`SceneConfig`]) is validated at its setters so rejected input never
//! reaches the draw loop; the fixed parts (view, layout, assets, trajectory)
//! are validated once when the application config is loaded.
//!
//! ## Sections
//!
//! - **Engine**: logging
//! - **Scene**: lamp scale, fill-light RGB, playback velocity
//! - **Trajectory**: keyframe table parameters
//! - **View**: projection parameters and the initial camera distance
//! - **Layout**: number of lamp posts
//! - **Assets**: where models and textures live

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::animation::TrajectoryParams;
use crate::error::{SceneError, SceneResult};
use crate::foundation::math::utils;
use crate::render::TextureSources;

pub use crate::config::{Config, ConfigError};

/// Lamp post height scales offered to the user
pub const LAMP_SCALE_CHOICES: [f32; 6] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

/// Playback velocities offered to the user
pub const VELOCITY_CHOICES: [f32; 6] = [0.25, 0.5, 1.0, 1.5, 2.0, 3.0];

/// Values offered for each fill-light channel: 0.00 to 1.00 in steps of 0.01
pub fn channel_choices() -> Vec<f32> {
    (0..=100u8).map(|step| f32::from(step) / 100.0).collect()
}

/// Fill-light color channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorChannel {
    /// Red
    Red,
    /// Green
    Green,
    /// Blue
    Blue,
}

impl ColorChannel {
    const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }
}

/// # Engine Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Scene Configuration
///
/// User-tunable scalars read by the composer and the controller on every
/// frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Lamp post height multiplier
    pub lamp_scale: f32,
    /// Fill-light ambient RGB, each in `[0, 1]`
    pub fill_color: [f32; 3],
    /// Playback velocity multiplier
    pub velocity: f32,
}

impl SceneConfig {
    /// Defaults: unit lamp scale, yellow fill, normal speed
    pub const fn new() -> Self {
        Self {
            lamp_scale: 1.0,
            fill_color: [1.0, 1.0, 0.0],
            velocity: 1.0,
        }
    }

    /// Set the lamp height scale; must be positive and finite
    pub fn set_lamp_scale(&mut self, scale: f32) -> SceneResult<()> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(SceneError::InvalidParameter(format!(
                "lamp scale must be positive, got {scale}"
            )));
        }
        self.lamp_scale = scale;
        Ok(())
    }

    /// Set one fill-light channel, clamped to `[0, 1]`
    pub fn set_channel(&mut self, channel: ColorChannel, value: f32) {
        self.fill_color[channel.index()] = utils::clamp_unit(value);
    }

    /// One fill-light channel
    pub const fn channel(&self, channel: ColorChannel) -> f32 {
        self.fill_color[channel.index()]
    }

    /// Set the playback velocity; must be positive and finite
    pub fn set_velocity(&mut self, velocity: f32) -> SceneResult<()> {
        validate_velocity(velocity)?;
        self.velocity = velocity;
        Ok(())
    }

    /// Check every field
    pub fn validate(&self) -> Result<(), String> {
        if !(self.lamp_scale.is_finite() && self.lamp_scale > 0.0) {
            return Err(format!("lamp_scale must be positive, got {}", self.lamp_scale));
        }
        if self.fill_color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(format!("fill_color channels must be in [0, 1], got {:?}", self.fill_color));
        }
        validate_velocity(self.velocity).map_err(|e| e.to_string())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_velocity(velocity: f32) -> SceneResult<()> {
    if velocity.is_finite() && velocity > 0.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidParameter(format!(
            "velocity must be positive, got {velocity}"
        )))
    }
}

/// # View Configuration
///
/// Projection parameters, fixed once the composer is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
    /// Camera distance at startup
    pub initial_distance: f32,
}

impl ViewConfig {
    /// Validate the projection parameters
    pub fn validate(&self) -> Result<(), String> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(format!("fov_degrees must be in (0, 180), got {}", self.fov_degrees));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(format!(
                "clip planes must satisfy 0 < near < far, got near {} far {}",
                self.near, self.far
            ));
        }
        if !(self.initial_distance.is_finite() && self.initial_distance > 0.0) {
            return Err(format!("initial_distance must be positive, got {}", self.initial_distance));
        }
        Ok(())
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.5,
            far: 20000.0,
            initial_distance: 2500.0,
        }
    }
}

/// # Layout Configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Lamp posts placed along the street; the first one carries the accent light
    pub lamp_post_count: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { lamp_post_count: 2 }
    }
}

/// # Asset Configuration
///
/// Relative paths are resolved against `root`, or against the directory of
/// the running executable when `root` is unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Base directory for every asset path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// Model directory below the root
    pub models_dir: PathBuf,
    /// Motorcycle model, relative to `models_dir`
    pub motorcycle_model: PathBuf,
    /// Traffic light model, relative to `models_dir`
    pub traffic_light_model: PathBuf,
    /// Texture directory below the root
    pub textures_dir: PathBuf,
    /// Lamp post texture file
    pub wood_texture: PathBuf,
    /// Building texture file
    pub concrete_texture: PathBuf,
}

impl AssetConfig {
    /// Use an explicit asset root
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Directory every relative asset path starts from
    pub fn resolve_root(&self) -> PathBuf {
        if let Some(root) = &self.root {
            return root.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Full path of the motorcycle model
    pub fn motorcycle_path(&self) -> PathBuf {
        self.resolve_root().join(&self.models_dir).join(&self.motorcycle_model)
    }

    /// Full path of the traffic light model
    pub fn traffic_light_path(&self) -> PathBuf {
        self.resolve_root().join(&self.models_dir).join(&self.traffic_light_model)
    }

    /// Full paths of both textures
    pub fn texture_sources(&self) -> TextureSources {
        let dir = self.resolve_root().join(&self.textures_dir);
        TextureSources {
            wood: dir.join(&self.wood_texture),
            concrete: dir.join(&self.concrete_texture),
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: None,
            models_dir: PathBuf::from("3D Models"),
            motorcycle_model: PathBuf::from("Motorcycle/motorcycle.obj"),
            traffic_light_model: PathBuf::from("TrafficLight/trafficlight.obj"),
            textures_dir: PathBuf::from("Textures"),
            wood_texture: PathBuf::from("wood.png"),
            concrete_texture: PathBuf::from("concrete.png"),
        }
    }
}

/// # Complete Application Configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Runtime-tunable scene values
    pub scene: SceneConfig,
    /// Keyframe table parameters
    pub trajectory: TrajectoryParams,
    /// Projection
    pub view: ViewConfig,
    /// Scene layout
    pub layout: LayoutConfig,
    /// Asset locations
    pub assets: AssetConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scene.validate().map_err(ConfigError::Invalid)?;
        self.view.validate().map_err(ConfigError::Invalid)?;
        self.trajectory
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    /// Load from a TOML or RON file and validate
    pub fn load_validated(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

impl Config for ApplicationConfig {}
