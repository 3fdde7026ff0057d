//! Texture and light state for the street scene
//!
//! [`RenderStateManager`] owns the two texture objects and both light
//! descriptors. Every state it switches on around a draw is switched back
//! off before control returns, so no binding leaks between elements.

use std::path::PathBuf;

use crate::assets::ImageData;
use crate::error::{SceneError, SceneResult};
use crate::foundation::math::{utils, Vec3};
use crate::render::backend::{Capabilities, RenderBackend, TextureEnvMode, TextureId};
use crate::render::lighting::{LightDescriptor, LightId};

/// Material a texture is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureRole {
    /// Lamp posts
    Wood,
    /// Building facades
    Concrete,
}

impl TextureRole {
    /// Every role, in load order
    pub const ALL: [Self; 2] = [Self::Wood, Self::Concrete];

    /// How the role's texels combine with the lit color
    pub const fn env_mode(self) -> TextureEnvMode {
        match self {
            Self::Wood => TextureEnvMode::Modulate,
            Self::Concrete => TextureEnvMode::Replace,
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Wood => 0,
            Self::Concrete => 1,
        }
    }
}

/// Image files for each texture role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureSources {
    /// Lamp post texture
    pub wood: PathBuf,
    /// Building texture
    pub concrete: PathBuf,
}

impl TextureSources {
    /// Path for a role
    pub fn path(&self, role: TextureRole) -> &PathBuf {
        match role {
            TextureRole::Wood => &self.wood,
            TextureRole::Concrete => &self.concrete,
        }
    }
}

/// Owner of texture handles and light descriptors
#[derive(Debug)]
pub struct RenderStateManager {
    textures: [Option<TextureId>; 2],
    fill: LightDescriptor,
    accent: LightDescriptor,
}

/// Ambient RGB of the fill light before any slider input
pub const DEFAULT_FILL_COLOR: [f32; 3] = [1.0, 1.0, 0.0];

impl Default for RenderStateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderStateManager {
    /// Manager with no textures and the default light setup
    pub fn new() -> Self {
        Self {
            textures: [None; 2],
            fill: LightDescriptor::fill(Vec3::from(DEFAULT_FILL_COLOR)),
            accent: LightDescriptor::accent_spot(),
        }
    }

    /// Switch on lighting state and load both textures
    ///
    /// Any texture that fails to decode aborts initialization with
    /// [`SceneError::AssetLoad`]; textures already created stay owned by the
    /// manager and are freed by [`teardown`](Self::teardown).
    pub fn initialize<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        sources: &TextureSources,
    ) -> SceneResult<()> {
        backend.enable(
            Capabilities::LIGHTING
                | Capabilities::for_light(LightId::Fill)
                | Capabilities::for_light(LightId::Accent)
                | Capabilities::COLOR_MATERIAL
                | Capabilities::NORMALIZE,
        );

        for role in TextureRole::ALL {
            let image = ImageData::from_file(sources.path(role))?;
            self.register(backend, role, &image)?;
        }

        log::info!("Render state initialized");
        Ok(())
    }

    /// Upload an image for a role, replacing any previous texture
    pub fn register<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        role: TextureRole,
        image: &ImageData,
    ) -> SceneResult<TextureId> {
        let id = backend.create_texture(image)?;
        if let Some(previous) = self.textures[role.slot()].replace(id) {
            backend.delete_texture(previous)?;
        }
        log::debug!("Texture {:?} bound to role {:?}", id, role);
        Ok(id)
    }

    /// Texture created for a role
    pub const fn texture(&self, role: TextureRole) -> Option<TextureId> {
        self.textures[role.slot()]
    }

    /// Run `f` with the role's texture bound
    ///
    /// Texturing is switched off, the binding cleared and the environment
    /// mode reset to [`TextureEnvMode::Modulate`] whether or not `f`
    /// succeeds.
    pub fn with_texture<B, T>(
        &self,
        backend: &mut B,
        role: TextureRole,
        f: impl FnOnce(&mut B) -> SceneResult<T>,
    ) -> SceneResult<T>
    where
        B: RenderBackend + ?Sized,
    {
        let id = self
            .texture(role)
            .ok_or_else(|| SceneError::StateViolation(format!("{role:?} texture not loaded")))?;

        backend.enable(Capabilities::TEXTURE_2D);
        let result = backend
            .bind_texture(Some(id))
            .map_err(SceneError::from)
            .and_then(|()| {
                backend.set_texture_env_mode(role.env_mode());
                f(backend)
            });

        let unbound = backend.bind_texture(None);
        backend.set_texture_env_mode(TextureEnvMode::Modulate);
        backend.disable(Capabilities::TEXTURE_2D);

        let value = result?;
        unbound?;
        Ok(value)
    }

    /// Set the fill light's ambient RGB, clamping each channel to `[0, 1]`
    pub fn set_fill_light_color(&mut self, r: f32, g: f32, b: f32) {
        let rgb = Vec3::new(utils::clamp_unit(r), utils::clamp_unit(g), utils::clamp_unit(b));
        self.fill = self.fill.with_ambient(rgb);
    }

    /// Current fill ambient RGB
    pub fn fill_light_color(&self) -> Vec3 {
        self.fill.ambient.xyz()
    }

    /// Fill light descriptor
    pub const fn fill_light(&self) -> &LightDescriptor {
        &self.fill
    }

    /// Accent light descriptor
    pub const fn accent_light(&self) -> &LightDescriptor {
        &self.accent
    }

    /// Program the fill light at the current transform
    pub fn apply_fill_light<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        backend.set_light(LightId::Fill, &self.fill);
    }

    /// Program the accent light at the current transform
    pub fn apply_accent_light<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        backend.set_light(LightId::Accent, &self.accent);
    }

    /// Delete every texture; calling it again does nothing
    pub fn teardown<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        for slot in &mut self.textures {
            if let Some(id) = slot.take() {
                if let Err(e) = backend.delete_texture(id) {
                    log::warn!("Failed to delete texture {:?}: {}", id, e);
                }
            }
        }
    }

    /// Whether any texture is still held
    pub fn has_textures(&self) -> bool {
        self.textures.iter().any(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RecordingBackend, RenderCommand};
    use approx::assert_relative_eq;

    fn loaded(backend: &mut RecordingBackend) -> RenderStateManager {
        let mut state = RenderStateManager::new();
        let image = ImageData::solid_color(2, 2, [200, 150, 100, 255]);
        state.register(backend, TextureRole::Wood, &image).unwrap();
        state.register(backend, TextureRole::Concrete, &image).unwrap();
        state
    }

    #[test]
    fn test_with_texture_binds_then_resets() {
        let mut backend = RecordingBackend::new();
        let state = loaded(&mut backend);
        let concrete = state.texture(TextureRole::Concrete);

        state
            .with_texture(&mut backend, TextureRole::Concrete, |b| {
                assert_eq!(b.bound_texture(), concrete);
                assert_eq!(b.texture_env_mode(), TextureEnvMode::Replace);
                assert!(b.enabled().contains(Capabilities::TEXTURE_2D));
                b.draw_cube(1)?;
                Ok(())
            })
            .unwrap();

        assert_eq!(backend.bound_texture(), None);
        assert_eq!(backend.texture_env_mode(), TextureEnvMode::Modulate);
        assert!(!backend.enabled().contains(Capabilities::TEXTURE_2D));
    }

    #[test]
    fn test_with_texture_resets_on_error() {
        let mut backend = RecordingBackend::new();
        let state = loaded(&mut backend);

        let result: SceneResult<()> = state.with_texture(&mut backend, TextureRole::Wood, |_| {
            Err(SceneError::InvalidParameter("boom".to_string()))
        });

        assert!(matches!(result, Err(SceneError::InvalidParameter(_))));
        assert_eq!(backend.bound_texture(), None);
        assert!(!backend.enabled().contains(Capabilities::TEXTURE_2D));
    }

    #[test]
    fn test_with_texture_requires_loaded_role() {
        let mut backend = RecordingBackend::new();
        let state = RenderStateManager::new();
        let result = state.with_texture(&mut backend, TextureRole::Wood, |_| Ok(()));
        assert!(matches!(result, Err(SceneError::StateViolation(_))));
    }

    #[test]
    fn test_fill_color_is_clamped() {
        let mut state = RenderStateManager::new();
        state.set_fill_light_color(-0.5, 1.5, 0.5);
        let rgb = state.fill_light_color();
        assert_relative_eq!(rgb.x, 0.0);
        assert_relative_eq!(rgb.y, 1.0);
        assert_relative_eq!(rgb.z, 0.5);

        state.set_fill_light_color(f32::NAN, 0.25, 0.75);
        assert_relative_eq!(state.fill_light_color().x, 0.0);
    }

    #[test]
    fn test_lights_follow_transform() {
        let mut backend = RecordingBackend::new();
        let state = RenderStateManager::new();
        backend.translate(Vec3::new(3.0, 4.0, 5.0));
        state.apply_accent_light(&mut backend);
        state.apply_fill_light(&mut backend);

        let lights: Vec<_> = backend
            .commands()
            .iter()
            .filter_map(|command| match command {
                RenderCommand::Light { light, eye_position, .. } => Some((*light, *eye_position)),
                _ => None,
            })
            .collect();
        assert_eq!(lights.len(), 2);
        assert_eq!(lights[0].0, LightId::Accent);
        assert_relative_eq!(lights[0].1.y, 4.0);
        assert_relative_eq!(lights[1].1.y, 1504.0);
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut backend = RecordingBackend::new();
        let mut state = loaded(&mut backend);
        assert_eq!(backend.texture_count(), 2);

        state.teardown(&mut backend);
        state.teardown(&mut backend);
        assert_eq!(backend.texture_count(), 0);
        assert!(!state.has_textures());
    }

    #[test]
    fn test_initialize_fails_on_missing_file() {
        let mut backend = RecordingBackend::new();
        let mut state = RenderStateManager::new();
        let sources = TextureSources {
            wood: PathBuf::from("missing/wood.png"),
            concrete: PathBuf::from("missing/concrete.png"),
        };
        let result = state.initialize(&mut backend, &sources);
        assert!(matches!(result, Err(SceneError::AssetLoad(_))));
        assert_eq!(backend.texture_count(), 0);
    }
}
