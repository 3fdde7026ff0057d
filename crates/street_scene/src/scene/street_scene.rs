//! Lifecycle owner of the street scene
//!
//! [`StreetScene`] ties the backend, the model importer, the composer, the
//! render state and the animation together. The host shell only talks to
//! this type: it forwards resizes, elapsed time and [`SceneCommand`]s, and
//! calls [`StreetScene::draw`] when the dirty flag says so.

use std::time::Duration;

use crate::animation::AnimationController;
use crate::assets::AssetImporter;
use crate::core::ApplicationConfig;
use crate::error::{SceneError, SceneResult};
use crate::foundation::math::Vec4;
use crate::render::{Capabilities, RenderBackend, RenderStateManager, TextureSources};
use crate::scene::commands::SceneCommand;
use crate::scene::composer::{FrameContext, SceneComposer};
use crate::scene::state::SceneState;

/// The complete scene and everything it owns
pub struct StreetScene<B: RenderBackend, I: AssetImporter> {
    backend: B,
    importer: I,
    composer: SceneComposer,
    render_state: RenderStateManager,
    controller: AnimationController,
    state: SceneState,
    textures: TextureSources,
    torn_down: bool,
}

impl<B: RenderBackend, I: AssetImporter> StreetScene<B, I> {
    /// Validate the config, build the trajectory and load both models
    pub fn new(backend: B, mut importer: I, config: &ApplicationConfig) -> SceneResult<Self> {
        config.validate()?;

        let mut controller = AnimationController::new(&config.trajectory)?;
        controller.set_velocity(config.scene.velocity)?;

        let composer = SceneComposer::new(&mut importer, &config.assets, config.view, config.layout)?;

        Ok(Self {
            backend,
            importer,
            composer,
            render_state: RenderStateManager::new(),
            controller,
            state: SceneState::new(config.scene, config.view.initial_distance),
            textures: config.assets.texture_sources(),
            torn_down: false,
        })
    }

    /// Set fixed pipeline state and load the textures
    pub fn initialize(&mut self) -> SceneResult<()> {
        self.ensure_alive()?;
        self.backend.set_clear_color(Vec4::new(0.0, 0.0, 0.0, 1.0));
        self.backend.enable(Capabilities::CULL_FACE | Capabilities::DEPTH_TEST);
        self.render_state.initialize(&mut self.backend, &self.textures)?;
        self.state.mark_dirty();
        Ok(())
    }

    /// Draw one frame with the current config and animation frame
    pub fn draw(&mut self) -> SceneResult<()> {
        self.ensure_alive()?;
        let [r, g, b] = self.state.config.fill_color;
        self.render_state.set_fill_light_color(r, g, b);

        let frame = FrameContext {
            importer: &self.importer,
            state: &self.state,
            controller: &self.controller,
            render_state: &self.render_state,
        };
        self.composer.draw(&mut self.backend, &frame)
    }

    /// Forward a surface resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.composer.resize(&mut self.backend, width, height);
        self.state.mark_dirty();
    }

    /// Feed elapsed host time to the animation; returns ticks fired
    pub fn advance(&mut self, dt: Duration) -> usize {
        let fired = self.controller.advance(dt);
        if fired > 0 {
            self.state.mark_dirty();
        }
        fired
    }

    /// Apply one user command
    ///
    /// Every command is rejected with [`SceneError::StateViolation`] while
    /// the animation runs; parameter errors leave the prior value in place.
    pub fn apply(&mut self, command: SceneCommand) -> SceneResult<()> {
        if !self.controller.accepting_input() {
            log::warn!("Ignoring {:?} while the animation is running", command);
            return Err(SceneError::StateViolation(format!(
                "{command:?} rejected while the animation is running"
            )));
        }

        let camera = &mut self.state.camera;
        match command {
            SceneCommand::TiltUp => camera.pitch(-1),
            SceneCommand::TiltDown => camera.pitch(1),
            SceneCommand::TurnLeft => camera.yaw(-1),
            SceneCommand::TurnRight => camera.yaw(1),
            SceneCommand::ZoomIn => camera.zoom_in(),
            SceneCommand::ZoomOut => camera.zoom_out(),
            SceneCommand::StartAnimation => self.controller.start()?,
            SceneCommand::SetLampScale(scale) => self.state.config.set_lamp_scale(scale)?,
            SceneCommand::SetChannel(channel, value) => self.state.config.set_channel(channel, value),
            SceneCommand::SetVelocity(velocity) => {
                self.state.config.set_velocity(velocity)?;
                self.controller.set_velocity(velocity)?;
            }
        }

        log::debug!("Applied {:?}", command);
        self.state.mark_dirty();
        Ok(())
    }

    /// Cancel playback and rewind the motorcycle
    pub fn stop_animation(&mut self) {
        self.controller.stop();
        self.state.mark_dirty();
    }

    /// Release textures and models; later calls do nothing
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.controller.stop();
        self.render_state.teardown(&mut self.backend);
        self.composer.release(&mut self.importer);
        self.torn_down = true;
        log::info!("Street scene torn down");
    }

    /// Whether [`teardown`](Self::teardown) has run
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Read and clear the redraw flag
    pub fn take_dirty(&mut self) -> bool {
        self.state.take_dirty()
    }

    /// Render backend
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable render backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Model importer
    pub const fn importer(&self) -> &I {
        &self.importer
    }

    /// Animation playback
    pub const fn controller(&self) -> &AnimationController {
        &self.controller
    }

    /// Camera and user config
    pub const fn state(&self) -> &SceneState {
        &self.state
    }

    /// Textures and lights
    pub const fn render_state(&self) -> &RenderStateManager {
        &self.render_state
    }

    /// Composer
    pub const fn composer(&self) -> &SceneComposer {
        &self.composer
    }

    fn ensure_alive(&self) -> SceneResult<()> {
        if self.torn_down {
            Err(SceneError::StateViolation("scene has been torn down".to_string()))
        } else {
            Ok(())
        }
    }
}

impl<B: RenderBackend, I: AssetImporter> Drop for StreetScene<B, I> {
    fn drop(&mut self) {
        self.teardown();
    }
}
