//! Asset import layer
//!
//! Models reach the scene through the [`AssetImporter`] collaborator: load by
//! path, draw by handle, release by handle. [`MeshLibrary`] is the bundled
//! implementation backed by the OBJ loader. Texture images are decoded by
//! [`ImageData`].

pub mod image_loader;
pub mod mesh_library;
pub mod obj_loader;

pub use image_loader::ImageData;
pub use mesh_library::MeshLibrary;
pub use obj_loader::{ObjError, ObjLoader};

use std::path::Path;

use thiserror::Error;

use crate::foundation::collections::TypedHandle;
use crate::render::{Mesh, RenderBackend, RenderError};

/// Handle to a model held by an importer
pub type MeshHandle = TypedHandle<Mesh>;

/// Model import collaborator
pub trait AssetImporter {
    /// Load a model file; the handle stays valid until [`release`](Self::release)
    fn load(&mut self, path: &Path) -> Result<MeshHandle, AssetError>;

    /// Draw a loaded model with the backend's current transform
    fn draw(&self, handle: MeshHandle, backend: &mut dyn RenderBackend) -> Result<(), RenderError>;

    /// Free a loaded model; releasing an unknown handle is a no-op
    fn release(&mut self, handle: MeshHandle);
}

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Failed to load asset
    #[error("Failed to load asset: {0}")]
    LoadFailed(String),

    /// Invalid asset data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Unsupported asset format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ObjError> for AssetError {
    fn from(error: ObjError) -> Self {
        match error {
            ObjError::Io(io) => Self::IoError(io),
            parse @ ObjError::ParseError { .. } => Self::InvalidData(parse.to_string()),
            ObjError::InvalidFormat(message) => Self::InvalidData(message),
        }
    }
}
