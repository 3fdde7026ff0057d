//! # Rendering layer
//!
//! The scene never calls a graphics API directly. Everything goes through
//! the [`RenderBackend`] trait, which models a fixed-function pipeline:
//! transform stack, capability toggles, immediate primitives, texture
//! objects and light units.
//!
//! ## Contents
//!
//! - **Backend**: the collaborator trait and the [`scoped`] push/pop helper
//! - **Recording**: a headless backend that keeps a real matrix stack and a
//!   command log, used by the host app and by tests
//! - **State**: [`RenderStateManager`], owner of texture handles and light
//!   descriptors
//! - **Lighting** and **Mesh**: plain data types

pub mod backend;
pub mod lighting;
pub mod mesh;
pub mod recording;
pub mod state;

pub use backend::{
    scoped, RenderBackend, BackendResult, TextureId, ClearFlags, Capabilities,
    TextureEnvMode, CylinderSpec,
};
pub use lighting::{LightDescriptor, LightId, OMNIDIRECTIONAL_CUTOFF};
pub use mesh::{Mesh, Vertex};
pub use recording::{RecordingBackend, RenderCommand};
pub use state::{RenderStateManager, TextureRole, TextureSources};

use thiserror::Error;

/// Errors reported by render backends
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// `pop_transform` with nothing saved
    #[error("Transform stack underflow")]
    StackUnderflow,

    /// `push_transform` beyond the backend's stack capacity
    #[error("Transform stack overflow (depth {0})")]
    StackOverflow(usize),

    /// A texture id the backend does not know
    #[error("Unknown texture: {0:?}")]
    UnknownTexture(TextureId),

    /// Primitive data the backend cannot draw
    #[error("Invalid primitive: {0}")]
    InvalidPrimitive(String),

    /// Backend-specific failure
    #[error("Backend error: {0}")]
    BackendError(String),
}
