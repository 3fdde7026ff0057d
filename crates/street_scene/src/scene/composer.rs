//! Per-frame traversal of the street scene
//!
//! Every element is drawn inside its own [`scoped`] push/pop pair, so the
//! transform stack depth on leaving [`SceneComposer::draw`] equals the depth
//! on entry even when a draw call fails part way.

use crate::animation::{AnimationController, FrameOffset};
use crate::assets::{AssetImporter, MeshHandle};
use crate::core::{AssetConfig, LayoutConfig, ViewConfig};
use crate::error::SceneResult;
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::render::{
    scoped, ClearFlags, CylinderSpec, RenderBackend, RenderStateManager, TextureRole,
};
use crate::scene::layout;
use crate::scene::state::SceneState;

/// Everything a draw needs besides the backend
pub struct FrameContext<'a> {
    /// Model store
    pub importer: &'a dyn AssetImporter,
    /// Camera and user config
    pub state: &'a SceneState,
    /// Animation playback
    pub controller: &'a AnimationController,
    /// Textures and lights
    pub render_state: &'a RenderStateManager,
}

/// Builds the frame from layout constants and the loaded models
#[derive(Debug)]
pub struct SceneComposer {
    view: ViewConfig,
    layout: LayoutConfig,
    traffic_light: MeshHandle,
    motorcycle: MeshHandle,
    viewport: Option<(u32, u32)>,
}

impl SceneComposer {
    /// Load both models; the scene cannot exist without them
    pub fn new(
        importer: &mut dyn AssetImporter,
        assets: &AssetConfig,
        view: ViewConfig,
        layout: LayoutConfig,
    ) -> SceneResult<Self> {
        let traffic_light = importer.load(&assets.traffic_light_path())?;
        let motorcycle = match importer.load(&assets.motorcycle_path()) {
            Ok(handle) => handle,
            Err(e) => {
                importer.release(traffic_light);
                return Err(e.into());
            }
        };

        log::info!("Scene models loaded");
        Ok(Self {
            view,
            layout,
            traffic_light,
            motorcycle,
            viewport: None,
        })
    }

    /// Size of the last resize
    pub const fn viewport(&self) -> Option<(u32, u32)> {
        self.viewport
    }

    /// Free both models
    pub fn release(&self, importer: &mut dyn AssetImporter) {
        importer.release(self.traffic_light);
        importer.release(self.motorcycle);
    }

    /// Set viewport and projection for a new surface size
    ///
    /// The projection is rebuilt from scratch each call, so repeating a
    /// resize with the same size leaves identical state.
    pub fn resize(&mut self, backend: &mut dyn RenderBackend, width: u32, height: u32) {
        let aspect = width as f32 / height.max(1) as f32;
        let projection =
            Mat4::perspective_gl(self.view.fov_degrees, aspect, self.view.near, self.view.far);

        backend.viewport(0, 0, width, height);
        backend.set_projection(&projection);
        backend.load_identity();
        self.viewport = Some((width, height));
        log::debug!("Resized to {}x{} (aspect {:.3})", width, height, aspect);
    }

    /// Draw one frame
    pub fn draw(&self, backend: &mut dyn RenderBackend, frame: &FrameContext<'_>) -> SceneResult<()> {
        backend.clear(ClearFlags::COLOR | ClearFlags::DEPTH);

        let camera = frame.state.camera;
        scoped(backend, |b| {
            b.translate(Vec3::new(0.0, layout::CAMERA_HEIGHT_OFFSET, -camera.distance));
            b.rotate(camera.rotation_x, Vec3::x());
            b.rotate(camera.rotation_y, Vec3::y());

            frame.render_state.apply_fill_light(b);
            draw_ground(b)?;
            draw_buildings(b, frame.render_state)?;
            self.draw_model_group(b, frame)
        })?;

        backend.flush()?;
        Ok(())
    }

    fn draw_model_group(&self, backend: &mut dyn RenderBackend, frame: &FrameContext<'_>) -> SceneResult<()> {
        let offset = frame.controller.current_offset()?;
        scoped(backend, |b| {
            b.translate(layout::MODEL_GROUP_OFFSET);
            self.draw_traffic_light(b, frame.importer)?;
            self.draw_motorcycle(b, frame.importer, offset)?;
            self.draw_lamp_posts(b, frame)
        })
    }

    fn draw_traffic_light(&self, backend: &mut dyn RenderBackend, importer: &dyn AssetImporter) -> SceneResult<()> {
        scoped(backend, |b| {
            b.scale(Vec3::repeat(layout::TRAFFIC_LIGHT_SCALE));
            importer.draw(self.traffic_light, b)?;
            Ok(())
        })
    }

    fn draw_motorcycle(
        &self,
        backend: &mut dyn RenderBackend,
        importer: &dyn AssetImporter,
        offset: FrameOffset,
    ) -> SceneResult<()> {
        scoped(backend, |b| {
            let base = layout::MOTORCYCLE_BASE;
            b.translate(Vec3::new(
                base.x - offset.translate_x,
                base.y,
                base.z - offset.translate_z,
            ));
            b.rotate(layout::MOTORCYCLE_BASE_HEADING + offset.rotate_y, Vec3::y());
            b.rotate(offset.rotate_z, Vec3::z());
            b.scale(Vec3::repeat(layout::MOTORCYCLE_SCALE));
            importer.draw(self.motorcycle, b)?;
            Ok(())
        })
    }

    fn draw_lamp_posts(&self, backend: &mut dyn RenderBackend, frame: &FrameContext<'_>) -> SceneResult<()> {
        let height = layout::POST_HEIGHT * frame.state.config.lamp_scale;
        scoped(backend, |b| {
            for index in 0..self.layout.lamp_post_count {
                b.translate(Vec3::new(0.0, 0.0, layout::LAMP_POST_SPACING));
                draw_lamp_post(b, frame.render_state, height, index == 0)?;
            }
            Ok(())
        })
    }
}

fn draw_ground(backend: &mut dyn RenderBackend) -> SceneResult<()> {
    scoped(backend, |b| {
        b.set_color(layout::GROUND_COLOR);
        b.draw_quads(&layout::ground_quad())?;
        b.set_color(layout::ROAD_COLOR);
        b.draw_quads(&layout::road_quad())?;
        Ok(())
    })
}

fn draw_buildings(backend: &mut dyn RenderBackend, render_state: &RenderStateManager) -> SceneResult<()> {
    render_state.with_texture(backend, TextureRole::Concrete, |textured| {
        scoped(textured, |b| {
            b.set_color(layout::BUILDING_COLOR);
            b.translate(layout::BUILDING_ORIGIN);
            b.scale(layout::BUILDING_SCALE);
            b.draw_cube(1)?;
            for step in layout::BUILDING_STEPS {
                b.translate(step);
                b.draw_cube(1)?;
            }
            Ok(())
        })
    })
}

fn draw_lamp_post(
    backend: &mut dyn RenderBackend,
    render_state: &RenderStateManager,
    height: f32,
    carries_accent: bool,
) -> SceneResult<()> {
    render_state.with_texture(backend, TextureRole::Wood, |textured| {
        scoped(textured, |b| {
            b.set_color(layout::POST_COLOR);
            b.rotate(-90.0, Vec3::x());
            b.draw_cylinder(&CylinderSpec {
                base_radius: layout::POST_RADIUS,
                top_radius: layout::POST_RADIUS,
                height,
                slices: layout::POST_SLICES,
                stacks: layout::POST_STACKS,
            })?;
            Ok(())
        })
    })?;

    scoped(backend, |b| {
        b.set_color(layout::LAMP_COLOR);
        b.translate(Vec3::new(0.0, height + layout::LAMP_EDGE / 2.0, 0.0));
        if carries_accent {
            render_state.apply_accent_light(b);
        }
        b.scale(Vec3::repeat(layout::LAMP_EDGE));
        b.draw_cube(1)?;
        Ok(())
    })
}
