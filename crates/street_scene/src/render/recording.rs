//! Headless recording backend
//!
//! Implements [`RenderBackend`] without a GPU. It keeps the model-view stack
//! as real matrices, tracks bound texture and enabled capabilities, stores
//! texture objects in a slot map and logs every command with the transform
//! that was current when it ran. The host app renders through it and tests
//! inspect its log.

use slotmap::{DefaultKey, Key, KeyData};

use crate::assets::ImageData;
use crate::foundation::collections::HandleMap;
use crate::foundation::math::{Mat4, Mat4Ext, Vec3, Vec4};
use crate::render::backend::{
    BackendResult, Capabilities, ClearFlags, CylinderSpec, RenderBackend, TextureEnvMode, TextureId,
};
use crate::render::lighting::{LightDescriptor, LightId};
use crate::render::mesh::Mesh;
use crate::render::RenderError;

/// Default maximum model-view stack depth, as required of GL implementations
pub const DEFAULT_MAX_STACK_DEPTH: usize = 32;

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Buffers cleared
    Clear(ClearFlags),
    /// Frame submitted
    Flush,
    /// Transform saved
    PushTransform,
    /// Transform restored
    PopTransform,
    /// Quad list drawn
    Quads {
        /// Number of quads
        count: usize,
        /// Model-view matrix at draw time
        transform: Mat4,
        /// Texture bound at draw time
        texture: Option<TextureId>,
    },
    /// Cylinder drawn
    Cylinder {
        /// Shape parameters
        spec: CylinderSpec,
        /// Model-view matrix at draw time
        transform: Mat4,
        /// Texture bound at draw time
        texture: Option<TextureId>,
    },
    /// Cube drawn
    Cube {
        /// Face subdivisions
        subdivisions: u32,
        /// Model-view matrix at draw time
        transform: Mat4,
        /// Texture bound at draw time
        texture: Option<TextureId>,
    },
    /// Imported mesh drawn
    Mesh {
        /// Triangles submitted
        triangles: usize,
        /// Model-view matrix at draw time
        transform: Mat4,
    },
    /// Texture bound or unbound
    BindTexture(Option<TextureId>),
    /// Light unit programmed
    Light {
        /// Which unit
        light: LightId,
        /// Parameters
        descriptor: LightDescriptor,
        /// Light position after the current transform
        eye_position: Vec4,
    },
}

#[derive(Debug, Clone, Copy)]
struct TextureObject {
    width: u32,
    height: u32,
}

/// GPU-less backend that records what it is asked to do
#[derive(Debug)]
pub struct RecordingBackend {
    stack: Vec<Mat4>,
    max_depth: usize,
    deepest: usize,
    projection: Mat4,
    viewport: (i32, i32, u32, u32),
    clear_color: Vec4,
    color: Vec3,
    enabled: Capabilities,
    bound_texture: Option<TextureId>,
    env_mode: TextureEnvMode,
    textures: HandleMap<TextureObject>,
    commands: Vec<RenderCommand>,
    frames: u64,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    /// Create a backend with an identity transform and no state enabled
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_STACK_DEPTH)
    }

    /// Create a backend whose stack holds at most `max_depth` saved matrices
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            stack: vec![Mat4::identity()],
            max_depth,
            deepest: 0,
            projection: Mat4::identity(),
            viewport: (0, 0, 0, 0),
            clear_color: Vec4::zeros(),
            color: Vec3::new(1.0, 1.0, 1.0),
            enabled: Capabilities::empty(),
            bound_texture: None,
            env_mode: TextureEnvMode::default(),
            textures: HandleMap::new(),
            commands: Vec::new(),
            frames: 0,
        }
    }

    /// Number of saved matrices
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Deepest the stack has been
    pub const fn deepest(&self) -> usize {
        self.deepest
    }

    /// Current model-view matrix
    pub fn current_transform(&self) -> Mat4 {
        self.stack.last().copied().unwrap_or_else(Mat4::identity)
    }

    /// Current projection matrix
    pub const fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// Current viewport `(x, y, width, height)`
    pub const fn viewport_rect(&self) -> (i32, i32, u32, u32) {
        self.viewport
    }

    /// Clear color last set
    pub const fn clear_color(&self) -> Vec4 {
        self.clear_color
    }

    /// Vertex color last set
    pub const fn color(&self) -> Vec3 {
        self.color
    }

    /// Capabilities currently on
    pub const fn enabled(&self) -> Capabilities {
        self.enabled
    }

    /// Texture currently bound
    pub const fn bound_texture(&self) -> Option<TextureId> {
        self.bound_texture
    }

    /// Current texture environment mode
    pub const fn texture_env_mode(&self) -> TextureEnvMode {
        self.env_mode
    }

    /// Number of live texture objects
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Dimensions of a live texture
    pub fn texture_size(&self, texture: TextureId) -> Option<(u32, u32)> {
        self.textures
            .get(key_of(texture))
            .map(|object| (object.width, object.height))
    }

    /// Frames flushed so far
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Commands recorded since the last [`take_commands`](Self::take_commands)
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Drain the command log
    pub fn take_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of draw commands in the log
    pub fn draw_count(&self) -> usize {
        self.commands.iter().filter(|command| command.is_draw()).count()
    }

    fn top_mut(&mut self) -> &mut Mat4 {
        if self.stack.is_empty() {
            self.stack.push(Mat4::identity());
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn multiply(&mut self, matrix: &Mat4) {
        let top = self.top_mut();
        *top *= matrix;
    }
}

impl RenderCommand {
    /// Whether the command submits geometry
    pub const fn is_draw(&self) -> bool {
        matches!(
            self,
            Self::Quads { .. } | Self::Cylinder { .. } | Self::Cube { .. } | Self::Mesh { .. }
        )
    }
}

fn key_of(texture: TextureId) -> DefaultKey {
    DefaultKey::from(KeyData::from_ffi(texture.0))
}

impl RenderBackend for RecordingBackend {
    fn set_clear_color(&mut self, color: Vec4) {
        self.clear_color = color;
    }

    fn clear(&mut self, flags: ClearFlags) {
        self.commands.push(RenderCommand::Clear(flags));
    }

    fn flush(&mut self) -> BackendResult<()> {
        self.frames += 1;
        self.commands.push(RenderCommand::Flush);
        log::trace!("Flushed frame {}", self.frames);
        Ok(())
    }

    fn enable(&mut self, caps: Capabilities) {
        self.enabled.insert(caps);
    }

    fn disable(&mut self, caps: Capabilities) {
        self.enabled.remove(caps);
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.viewport = (x, y, width, height);
    }

    fn set_projection(&mut self, projection: &Mat4) {
        self.projection = Mat4::identity() * projection;
    }

    fn load_identity(&mut self) {
        *self.top_mut() = Mat4::identity();
    }

    fn push_transform(&mut self) -> BackendResult<()> {
        if self.depth() >= self.max_depth {
            return Err(RenderError::StackOverflow(self.depth()));
        }
        let top = self.current_transform();
        self.stack.push(top);
        self.deepest = self.deepest.max(self.depth());
        self.commands.push(RenderCommand::PushTransform);
        Ok(())
    }

    fn pop_transform(&mut self) -> BackendResult<()> {
        if self.stack.len() <= 1 {
            return Err(RenderError::StackUnderflow);
        }
        self.stack.pop();
        self.commands.push(RenderCommand::PopTransform);
        Ok(())
    }

    fn translate(&mut self, offset: Vec3) {
        self.multiply(&Mat4::new_translation(&offset));
    }

    fn rotate(&mut self, degrees: f32, axis: Vec3) {
        self.multiply(&Mat4::rotation_degrees(degrees, axis));
    }

    fn scale(&mut self, factors: Vec3) {
        self.multiply(&Mat4::new_nonuniform_scaling(&factors));
    }

    fn set_color(&mut self, color: Vec3) {
        self.color = color;
    }

    fn draw_quads(&mut self, vertices: &[Vec3]) -> BackendResult<()> {
        if vertices.len() % 4 != 0 {
            return Err(RenderError::InvalidPrimitive(format!(
                "quad list needs a multiple of 4 vertices, got {}",
                vertices.len()
            )));
        }
        self.commands.push(RenderCommand::Quads {
            count: vertices.len() / 4,
            transform: self.current_transform(),
            texture: self.bound_texture,
        });
        Ok(())
    }

    fn draw_cylinder(&mut self, cylinder: &CylinderSpec) -> BackendResult<()> {
        if cylinder.slices < 3 || cylinder.stacks == 0 {
            return Err(RenderError::InvalidPrimitive(format!(
                "cylinder needs >= 3 slices and >= 1 stack, got {}x{}",
                cylinder.slices, cylinder.stacks
            )));
        }
        self.commands.push(RenderCommand::Cylinder {
            spec: *cylinder,
            transform: self.current_transform(),
            texture: self.bound_texture,
        });
        Ok(())
    }

    fn draw_cube(&mut self, subdivisions: u32) -> BackendResult<()> {
        if subdivisions == 0 {
            return Err(RenderError::InvalidPrimitive(
                "cube needs at least one subdivision".to_string(),
            ));
        }
        self.commands.push(RenderCommand::Cube {
            subdivisions,
            transform: self.current_transform(),
            texture: self.bound_texture,
        });
        Ok(())
    }

    fn draw_mesh(&mut self, mesh: &Mesh) -> BackendResult<()> {
        self.commands.push(RenderCommand::Mesh {
            triangles: mesh.triangle_count(),
            transform: self.current_transform(),
        });
        Ok(())
    }

    fn create_texture(&mut self, image: &ImageData) -> BackendResult<TextureId> {
        if image.width == 0 || image.height == 0 {
            return Err(RenderError::BackendError(
                "texture image has zero size".to_string(),
            ));
        }
        let key = self.textures.insert(TextureObject {
            width: image.width,
            height: image.height,
        });
        let id = TextureId(key.data().as_ffi());
        log::debug!("Created texture {:?} ({}x{})", id, image.width, image.height);
        Ok(id)
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) -> BackendResult<()> {
        if let Some(id) = texture {
            if !self.textures.contains_key(key_of(id)) {
                return Err(RenderError::UnknownTexture(id));
            }
        }
        self.bound_texture = texture;
        self.commands.push(RenderCommand::BindTexture(texture));
        Ok(())
    }

    fn set_texture_env_mode(&mut self, mode: TextureEnvMode) {
        self.env_mode = mode;
    }

    fn delete_texture(&mut self, texture: TextureId) -> BackendResult<()> {
        self.textures
            .remove(key_of(texture))
            .ok_or(RenderError::UnknownTexture(texture))?;
        if self.bound_texture == Some(texture) {
            self.bound_texture = None;
        }
        Ok(())
    }

    fn set_light(&mut self, light: LightId, descriptor: &LightDescriptor) {
        let eye_position = self.current_transform() * descriptor.position;
        self.commands.push(RenderCommand::Light {
            light,
            descriptor: *descriptor,
            eye_position,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_push_pop_restores_transform() {
        let mut backend = RecordingBackend::new();
        backend.translate(Vec3::new(1.0, 2.0, 3.0));
        let before = backend.current_transform();

        backend.push_transform().unwrap();
        backend.rotate(90.0, Vec3::y());
        backend.scale(Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(backend.depth(), 1);
        backend.pop_transform().unwrap();

        assert_eq!(backend.depth(), 0);
        assert_eq!(backend.current_transform(), before);
        assert_eq!(backend.deepest(), 1);
    }

    #[test]
    fn test_pop_underflow() {
        let mut backend = RecordingBackend::new();
        assert_eq!(backend.pop_transform(), Err(RenderError::StackUnderflow));
    }

    #[test]
    fn test_push_overflow() {
        let mut backend = RecordingBackend::with_max_depth(2);
        backend.push_transform().unwrap();
        backend.push_transform().unwrap();
        assert_eq!(backend.push_transform(), Err(RenderError::StackOverflow(2)));
    }

    #[test]
    fn test_transforms_compose_in_call_order() {
        let mut backend = RecordingBackend::new();
        backend.translate(Vec3::new(10.0, 0.0, 0.0));
        backend.scale(Vec3::new(2.0, 2.0, 2.0));

        let point = backend.current_transform().transform_point(&crate::foundation::math::Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(point.x, 12.0);
    }

    #[test]
    fn test_texture_lifecycle() {
        let mut backend = RecordingBackend::new();
        let image = ImageData::solid_color(4, 2, [255, 255, 255, 255]);
        let texture = backend.create_texture(&image).unwrap();

        assert_eq!(backend.texture_size(texture), Some((4, 2)));
        backend.bind_texture(Some(texture)).unwrap();
        backend.draw_cube(1).unwrap();
        backend.bind_texture(None).unwrap();
        backend.delete_texture(texture).unwrap();

        assert_eq!(backend.texture_count(), 0);
        assert_eq!(backend.bind_texture(Some(texture)), Err(RenderError::UnknownTexture(texture)));
        assert!(matches!(
            backend.commands()[1],
            RenderCommand::Cube { texture: Some(id), .. } if id == texture
        ));
    }

    #[test]
    fn test_quads_must_be_complete() {
        let mut backend = RecordingBackend::new();
        assert!(backend.draw_quads(&[Vec3::zeros(); 3]).is_err());
        backend.draw_quads(&[Vec3::zeros(); 8]).unwrap();
        assert_eq!(backend.draw_count(), 1);
    }

    #[test]
    fn test_light_position_follows_transform() {
        let mut backend = RecordingBackend::new();
        backend.translate(Vec3::new(0.0, 5.0, 0.0));
        backend.set_light(LightId::Accent, &LightDescriptor::accent_spot());

        match &backend.commands()[0] {
            RenderCommand::Light { eye_position, .. } => {
                assert_eq!(*eye_position, Vec4::new(0.0, 5.0, 0.0, 1.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
