//! Backend abstraction for the rendering collaborator
//!
//! The scene talks to the graphics API only through [`RenderBackend`], a
//! fixed-function style interface: a model-view transform stack, capability
//! toggles, immediate primitives, texture objects and light units. The
//! scene's correctness relies on two properties of an implementation:
//! pushes and pops nest like a stack, and binding is idempotent.

use bitflags::bitflags;

use crate::assets::ImageData;
use crate::foundation::math::{Mat4, Vec3, Vec4};
use crate::render::lighting::{LightDescriptor, LightId};
use crate::render::mesh::Mesh;
use crate::render::RenderError;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Handle to a texture object stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

bitflags! {
    /// Buffers cleared at the start of a frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u32 {
        /// Color buffer
        const COLOR = 1 << 0;
        /// Depth buffer
        const DEPTH = 1 << 1;
    }
}

bitflags! {
    /// Pipeline state toggles
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Back-face culling
        const CULL_FACE = 1 << 0;
        /// Depth testing
        const DEPTH_TEST = 1 << 1;
        /// Lighting calculations
        const LIGHTING = 1 << 2;
        /// Fill light unit
        const FILL_LIGHT = 1 << 3;
        /// Accent light unit
        const ACCENT_LIGHT = 1 << 4;
        /// Vertex colors drive material ambient and diffuse
        const COLOR_MATERIAL = 1 << 5;
        /// Renormalize normals after scaling
        const NORMALIZE = 1 << 6;
        /// 2D texturing
        const TEXTURE_2D = 1 << 7;
    }
}

impl Capabilities {
    /// Capability bit that switches a light unit on
    pub const fn for_light(light: LightId) -> Self {
        match light {
            LightId::Fill => Self::FILL_LIGHT,
            LightId::Accent => Self::ACCENT_LIGHT,
        }
    }
}

/// How a bound texture combines with the lit fragment color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureEnvMode {
    /// Texel multiplied with the lit color; the neutral mode
    #[default]
    Modulate,
    /// Texel replaces the lit color
    Replace,
}

/// Quadric cylinder along +Z, base at the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderSpec {
    /// Radius at z = 0
    pub base_radius: f32,
    /// Radius at z = height
    pub top_radius: f32,
    /// Length along +Z
    pub height: f32,
    /// Subdivisions around the axis
    pub slices: u32,
    /// Subdivisions along the axis
    pub stacks: u32,
}

/// Rendering primitive collaborator
pub trait RenderBackend {
    /// Color used by the next color-buffer clear
    fn set_clear_color(&mut self, color: Vec4);

    /// Clear the selected buffers
    fn clear(&mut self, flags: ClearFlags);

    /// Submit everything recorded for this frame
    fn flush(&mut self) -> BackendResult<()>;

    /// Switch capabilities on
    fn enable(&mut self, caps: Capabilities);

    /// Switch capabilities off
    fn disable(&mut self, caps: Capabilities);

    /// Set the viewport rectangle
    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Replace the projection matrix (identity, then `projection`)
    fn set_projection(&mut self, projection: &Mat4);

    /// Reset the current model-view matrix to identity
    fn load_identity(&mut self);

    /// Save the current model-view matrix
    fn push_transform(&mut self) -> BackendResult<()>;

    /// Restore the most recently saved model-view matrix
    fn pop_transform(&mut self) -> BackendResult<()>;

    /// Post-multiply a translation
    fn translate(&mut self, offset: Vec3);

    /// Post-multiply a rotation of `degrees` around `axis`
    fn rotate(&mut self, degrees: f32, axis: Vec3);

    /// Post-multiply a non-uniform scale
    fn scale(&mut self, factors: Vec3);

    /// Current vertex color
    fn set_color(&mut self, color: Vec3);

    /// Draw a quad list; `vertices.len()` must be a multiple of four
    fn draw_quads(&mut self, vertices: &[Vec3]) -> BackendResult<()>;

    /// Draw a quadric cylinder
    fn draw_cylinder(&mut self, cylinder: &CylinderSpec) -> BackendResult<()>;

    /// Draw a cube spanning [-1, 1] on every axis, each face split into
    /// `subdivisions` x `subdivisions` quads
    fn draw_cube(&mut self, subdivisions: u32) -> BackendResult<()>;

    /// Draw an imported triangle mesh
    fn draw_mesh(&mut self, mesh: &Mesh) -> BackendResult<()>;

    /// Upload an image as a texture object
    fn create_texture(&mut self, image: &ImageData) -> BackendResult<TextureId>;

    /// Bind a texture, or unbind with `None`
    fn bind_texture(&mut self, texture: Option<TextureId>) -> BackendResult<()>;

    /// Set the texture environment mode
    fn set_texture_env_mode(&mut self, mode: TextureEnvMode);

    /// Release a texture object
    fn delete_texture(&mut self, texture: TextureId) -> BackendResult<()>;

    /// Program a light unit; the position is taken in the current transform
    fn set_light(&mut self, light: LightId, descriptor: &LightDescriptor);
}

/// Run `f` inside a push/pop pair
///
/// The pop happens even when `f` fails, so the stack depth on return always
/// equals the depth on entry. An error from `f` wins over an error from the
/// pop.
pub fn scoped<B, T, E>(backend: &mut B, f: impl FnOnce(&mut B) -> Result<T, E>) -> Result<T, E>
where
    B: RenderBackend + ?Sized,
    E: From<RenderError>,
{
    backend.push_transform()?;
    let result = f(backend);
    let popped = backend.pop_transform();
    let value = result?;
    popped?;
    Ok(value)
}
