//! # Street Scene
//!
//! Scene composition and scripted keyframe animation for a small outdoor
//! street: ground and road, textured buildings, a traffic light, lamp posts
//! with a fill and an accent light, and a motorcycle that plays back a
//! precomputed turning maneuver.
//!
//! ## Features
//!
//! - **Transform traversal**: every element drawn inside a balanced push/pop scope
//! - **Keyframe animation**: four precomputed offset tables played back on a tick
//! - **Render state**: texture and light toggles always paired with their reset
//! - **Configuration**: serde config tree loadable from TOML or RON
//! - **Headless backend**: a recording backend for hosts and tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use street_scene::prelude::*;
//!
//! fn main() -> Result<(), SceneError> {
//!     let config = ApplicationConfig::default();
//!     let mut scene = StreetScene::new(RecordingBackend::new(), MeshLibrary::new(), &config)?;
//!     scene.initialize()?;
//!     scene.resize(800, 600);
//!     scene.apply(SceneCommand::StartAnimation)?;
//!
//!     while scene.controller().is_running() {
//!         scene.advance(Duration::from_millis(16));
//!         if scene.take_dirty() {
//!             scene.draw()?;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;

pub mod foundation;
pub mod config;
pub mod animation;
pub mod assets;
pub mod render;
pub mod scene;

mod error;

pub use error::{SceneError, SceneResult};

/// Common imports for scene users
pub mod prelude {
    pub use crate::{
        SceneError, SceneResult,
        core::{ApplicationConfig, SceneConfig, ColorChannel, Config},
        animation::{AnimationController, AnimationPhase, Trajectory, TrajectoryParams},
        assets::{AssetImporter, MeshLibrary},
        foundation::math::{Vec3, Vec4, Mat4},
        render::{RenderBackend, RecordingBackend, RenderStateManager},
        scene::{SceneCommand, StreetScene},
    };
}
