//! Crate-level error type

use thiserror::Error;

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::render::RenderError;

/// Errors surfaced by the scene, its animation and its configuration surface
#[derive(Error, Debug)]
pub enum SceneError {
    /// A required model or texture could not be loaded; the scene cannot be built
    #[error("Scene load failed: {0}")]
    AssetLoad(#[from] AssetError),

    /// A parameter was rejected at the configuration boundary; prior state is kept
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An operation arrived in a state that does not allow it
    #[error("State violation: {0}")]
    StateViolation(String),

    /// The render backend refused an operation
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Configuration file could not be read or validated
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;
