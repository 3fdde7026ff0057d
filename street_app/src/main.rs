//! Street scene host application
//!
//! Headless stand-in for the interactive shell: loads the configuration,
//! builds the scene over the recording backend, plays the motorcycle
//! maneuver once with a fixed host loop and reports what was drawn.
//!
//! Usage: `street_app [config.toml|config.ron]`

use std::time::Duration;

use street_scene::foundation::logging;
use street_scene::prelude::*;
use street_scene::core::ConfigError;
use thiserror::Error;

/// Host loop step, roughly one 60 Hz display refresh
const HOST_FRAME: Duration = Duration::from_millis(16);

/// Upper bound on host frames so a misconfigured trajectory cannot spin forever
const MAX_HOST_FRAMES: usize = 100_000;

#[derive(Error, Debug)]
enum AppError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("scene: {0}")]
    Scene(#[from] SceneError),

    #[error("animation did not finish within {0} host frames")]
    Runaway(usize),
}

#[derive(Debug, Default)]
struct RunSummary {
    host_frames: usize,
    ticks: usize,
    drawn_frames: usize,
    draw_calls: usize,
    max_depth: usize,
}

fn load_config() -> Result<ApplicationConfig, AppError> {
    match std::env::args().nth(1) {
        Some(path) => Ok(ApplicationConfig::load_validated(&path)?),
        None => Ok(ApplicationConfig::default()),
    }
}

fn run(config: &ApplicationConfig) -> Result<RunSummary, AppError> {
    let mut scene = StreetScene::new(RecordingBackend::new(), MeshLibrary::new(), config)?;
    scene.initialize()?;
    scene.resize(800, 600);

    let mut summary = RunSummary::default();
    scene.draw()?;
    scene.take_dirty();

    scene.apply(SceneCommand::StartAnimation)?;
    log::info!(
        "Playing {} frames, tick period {:?}",
        scene.controller().trajectory().len(),
        scene.controller().tick_period()
    );

    while scene.controller().is_running() {
        if summary.host_frames >= MAX_HOST_FRAMES {
            return Err(AppError::Runaway(MAX_HOST_FRAMES));
        }
        summary.host_frames += 1;
        summary.ticks += scene.advance(HOST_FRAME);

        if scene.take_dirty() {
            scene.draw()?;
            let commands = scene.backend_mut().take_commands();
            summary.drawn_frames += 1;
            summary.draw_calls += commands.iter().filter(|command| command.is_draw()).count();
        }
    }

    summary.max_depth = scene.backend().deepest();
    scene.teardown();
    Ok(summary)
}

fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            log::error!("{e}");
            std::process::exit(1);
        }
    };
    logging::init(&config.engine.log_level);

    log::info!("Starting street scene");
    match run(&config) {
        Ok(summary) => {
            log::info!(
                "Animation finished: {} host frames, {} ticks, {} frames drawn, {} draw calls, max stack depth {}",
                summary.host_frames,
                summary.ticks,
                summary.drawn_frames,
                summary.draw_calls,
                summary.max_depth
            );
        }
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    }
}
