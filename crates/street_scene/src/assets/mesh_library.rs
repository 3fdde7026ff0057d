//! Slot-map backed model store

use std::path::Path;

use crate::assets::{AssetError, AssetImporter, MeshHandle, ObjLoader};
use crate::foundation::collections::HandleMap;
use crate::render::{Mesh, RenderBackend, RenderError};

/// Importer that reads OBJ files into an in-memory mesh store
#[derive(Debug, Default)]
pub struct MeshLibrary {
    meshes: HandleMap<Mesh>,
}

impl MeshLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an already built mesh
    pub fn insert(&mut self, mesh: Mesh) -> MeshHandle {
        MeshHandle::new(self.meshes.insert(mesh))
    }

    /// Look up a mesh
    pub fn get(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.meshes.get(handle.key())
    }

    /// Number of meshes held
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether the library holds nothing
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

impl AssetImporter for MeshLibrary {
    fn load(&mut self, path: &Path) -> Result<MeshHandle, AssetError> {
        if !path.is_file() {
            return Err(AssetError::NotFound(path.display().to_string()));
        }
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("obj") => {}
            _ => return Err(AssetError::UnsupportedFormat(path.display().to_string())),
        }

        let mesh = ObjLoader::load_obj(path)?;
        log::info!(
            "Loaded model {:?}: {} vertices, {} triangles",
            path,
            mesh.vertices.len(),
            mesh.triangle_count()
        );
        Ok(self.insert(mesh))
    }

    fn draw(&self, handle: MeshHandle, backend: &mut dyn RenderBackend) -> Result<(), RenderError> {
        let mesh = self
            .get(handle)
            .ok_or_else(|| RenderError::InvalidPrimitive(format!("released mesh {handle:?}")))?;
        backend.draw_mesh(mesh)
    }

    fn release(&mut self, handle: MeshHandle) {
        if self.meshes.remove(handle.key()).is_some() {
            log::debug!("Released mesh {:?}", handle);
        }
    }
}
