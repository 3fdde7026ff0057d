//! # Street scene
//!
//! Layout constants, camera and config state, the per-frame composer and
//! [`StreetScene`], which owns the whole lifecycle.

pub mod commands;
pub mod composer;
pub mod layout;
pub mod state;
pub mod street_scene;

pub use commands::SceneCommand;
pub use composer::{FrameContext, SceneComposer};
pub use state::{CameraState, SceneState};
pub use street_scene::StreetScene;
