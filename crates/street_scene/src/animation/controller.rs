//! Animation state machine
//!
//! Advances a frame cursor through a [`Trajectory`] on a periodic tick. The
//! host drives it either by calling [`AnimationController::tick`] from its
//! own timer or by feeding elapsed time to [`AnimationController::advance`],
//! which fires as many ticks as whole periods have elapsed.

use std::time::Duration;

use crate::animation::trajectory::{FrameOffset, Trajectory, TrajectoryParams};
use crate::error::{SceneError, SceneResult};

/// Tick period at velocity 1.0
pub const BASE_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Playback stops this many frames before the end of the tables
pub const SAFETY_MARGIN_FRAMES: usize = 5;

/// Playback phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    /// Waiting for a start command; the scene accepts input
    Idle,
    /// Playing back the trajectory
    Running,
}

/// Frame cursor and phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationState {
    /// Current frame, always in `[0, steps_number)`
    pub frame_index: usize,
    /// Current phase
    pub phase: AnimationPhase,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            frame_index: 0,
            phase: AnimationPhase::Idle,
        }
    }
}

/// Owns the trajectory tables and the playback state
#[derive(Debug, Clone)]
pub struct AnimationController {
    trajectory: Trajectory,
    state: AnimationState,
    velocity: f32,
    /// Host time not yet consumed by a tick
    accumulated: Duration,
}

impl AnimationController {
    /// Build the trajectory and start in `Idle`
    pub fn new(params: &TrajectoryParams) -> SceneResult<Self> {
        params.validate()?;

        Ok(Self {
            trajectory: Trajectory::generate(params),
            state: AnimationState::default(),
            velocity: 1.0,
            accumulated: Duration::ZERO,
        })
    }

    /// Current state snapshot
    pub const fn state(&self) -> AnimationState {
        self.state
    }

    /// The tables this controller plays back
    pub const fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Current frame index
    pub const fn frame_index(&self) -> usize {
        self.state.frame_index
    }

    /// Whether playback is in progress
    pub fn is_running(&self) -> bool {
        self.state.phase == AnimationPhase::Running
    }

    /// Whether the scene may accept animation or camera input
    pub fn accepting_input(&self) -> bool {
        self.state.phase == AnimationPhase::Idle
    }

    /// Current playback velocity
    pub const fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Set playback velocity; must be finite and positive
    pub fn set_velocity(&mut self, velocity: f32) -> SceneResult<()> {
        if !velocity.is_finite() || velocity <= 0.0 {
            return Err(SceneError::InvalidParameter(format!(
                "velocity must be a positive number, got {velocity}"
            )));
        }

        log::debug!("Animation velocity set to {velocity}");
        self.velocity = velocity;
        Ok(())
    }

    /// Time between ticks at the current velocity
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn tick_period(&self) -> Duration {
        let nanos = BASE_TICK_INTERVAL.as_nanos() as f64 / f64::from(self.velocity);
        Duration::from_nanos((nanos.round() as u64).max(1))
    }

    /// Begin playback from frame 0
    pub fn start(&mut self) -> SceneResult<()> {
        if self.is_running() {
            return Err(SceneError::StateViolation(
                "animation is already running".to_string(),
            ));
        }

        log::info!(
            "Starting animation: {} frames at velocity {}",
            self.trajectory.len(),
            self.velocity
        );
        self.state = AnimationState {
            frame_index: 0,
            phase: AnimationPhase::Running,
        };
        self.accumulated = Duration::ZERO;
        Ok(())
    }

    /// Cancel playback and rewind
    pub fn stop(&mut self) {
        if self.is_running() {
            log::info!("Animation stopped at frame {}", self.state.frame_index);
        }
        self.state = AnimationState::default();
        self.accumulated = Duration::ZERO;
    }

    /// Advance one frame; returns to `Idle` once past the safety margin
    ///
    /// Ticks arriving while idle are ignored.
    pub fn tick(&mut self) {
        if !self.is_running() {
            return;
        }

        let next = self.state.frame_index + 1;
        if next + SAFETY_MARGIN_FRAMES > self.trajectory.len() {
            log::info!("Animation finished after {next} frames");
            self.stop();
        } else {
            self.state.frame_index = next;
            log::trace!("Animation frame {next}");
        }
    }

    /// Feed elapsed host time; returns the number of ticks fired
    pub fn advance(&mut self, dt: Duration) -> usize {
        if !self.is_running() {
            return 0;
        }

        let period = self.tick_period();
        self.accumulated += dt;
        let mut fired = 0;
        while self.is_running() && self.accumulated >= period {
            self.accumulated -= period;
            self.tick();
            fired += 1;
        }
        fired
    }

    /// Offsets for the current frame
    pub fn current_offset(&self) -> SceneResult<FrameOffset> {
        self.trajectory
            .offset_at(self.state.frame_index)
            .ok_or_else(|| {
                SceneError::StateViolation(format!(
                    "frame {} outside trajectory of {} frames",
                    self.state.frame_index,
                    self.trajectory.len()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(steps_number: usize, turn_begin: usize, turn_end: usize) -> AnimationController {
        AnimationController::new(&TrajectoryParams {
            steps_number,
            turn_begin,
            turn_end,
            ..TrajectoryParams::default()
        })
        .unwrap()
    }

    #[test]
    fn test_starts_idle() {
        let animation = controller(230, 30, 75);
        assert_eq!(animation.state(), AnimationState::default());
        assert!(animation.accepting_input());
        assert!(!animation.is_running());
    }

    #[test]
    fn test_start_transitions_to_running() {
        let mut animation = controller(230, 30, 75);
        animation.start().unwrap();
        assert!(animation.is_running());
        assert!(!animation.accepting_input());
    }

    #[test]
    fn test_start_while_running_is_rejected() {
        let mut animation = controller(230, 30, 75);
        animation.start().unwrap();
        animation.tick();

        let result = animation.start();
        assert!(matches!(result, Err(SceneError::StateViolation(_))));
        assert_eq!(animation.frame_index(), 1);
    }

    #[test]
    fn test_returns_to_idle_after_steps_minus_four_ticks() {
        for steps in [5, 6, 50, 230] {
            let mut animation = controller(steps, 1, 3);
            animation.start().unwrap();

            for _ in 0..steps - 5 {
                animation.tick();
                assert!(animation.is_running());
            }
            animation.tick();

            assert!(!animation.is_running(), "steps = {steps}");
            assert_eq!(animation.frame_index(), 0);
        }
    }

    #[test]
    fn test_scenario_turn_and_finish() {
        let mut animation = controller(230, 30, 75);
        let rotate_y = animation.trajectory().rotate_y().to_vec();
        animation.start().unwrap();

        for _ in 0..40 {
            animation.tick();
        }
        let offset = animation.current_offset().unwrap();
        assert_eq!(animation.frame_index(), 40);
        assert_eq!(offset.rotate_y, rotate_y[40]);
        assert!(rotate_y[40] > rotate_y[29]);
        assert_eq!(rotate_y[29], rotate_y[0]);

        for _ in 40..226 {
            animation.tick();
        }
        assert!(animation.accepting_input());
        assert_eq!(animation.frame_index(), 0);
    }

    #[test]
    fn test_current_offset_defined_for_every_reachable_frame() {
        let mut animation = controller(60, 10, 30);
        animation.start().unwrap();
        while animation.is_running() {
            assert!(animation.frame_index() < 60);
            assert!(animation.current_offset().is_ok());
            animation.tick();
        }
        assert!(animation.current_offset().is_ok());
    }

    #[test]
    fn test_short_trajectories_stop_on_first_tick() {
        let mut animation = controller(1, 0, 0);
        animation.start().unwrap();
        assert!(animation.current_offset().is_ok());
        animation.tick();
        assert!(!animation.is_running());
    }

    #[test]
    fn test_velocity_validation() {
        let mut animation = controller(230, 30, 75);
        animation.set_velocity(2.0).unwrap();

        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                animation.set_velocity(bad),
                Err(SceneError::InvalidParameter(_))
            ));
        }
        assert_eq!(animation.velocity(), 2.0);
        assert_eq!(animation.tick_period(), Duration::from_millis(25));
    }

    #[test]
    fn test_advance_fires_whole_periods() {
        let mut animation = controller(230, 30, 75);
        assert_eq!(animation.advance(Duration::from_secs(1)), 0);

        animation.start().unwrap();
        assert_eq!(animation.advance(Duration::from_millis(120)), 2);
        assert_eq!(animation.frame_index(), 2);
        // 20ms carried over from the previous call
        assert_eq!(animation.advance(Duration::from_millis(30)), 1);
        assert_eq!(animation.frame_index(), 3);
    }

    #[test]
    fn test_advance_stops_at_end() {
        let mut animation = controller(20, 5, 10);
        animation.start().unwrap();
        let fired = animation.advance(Duration::from_secs(60));
        assert_eq!(fired, 16);
        assert!(!animation.is_running());
    }

    #[test]
    fn test_stop_rewinds() {
        let mut animation = controller(230, 30, 75);
        animation.start().unwrap();
        animation.advance(Duration::from_millis(500));
        animation.stop();

        assert_eq!(animation.state(), AnimationState::default());
        animation.tick();
        assert_eq!(animation.frame_index(), 0);
    }

    #[test]
    fn test_invalid_trajectory_rejected() {
        let result = AnimationController::new(&TrajectoryParams {
            steps_number: 0,
            ..TrajectoryParams::default()
        });
        assert!(matches!(result, Err(SceneError::InvalidParameter(_))));
    }

    #[test]
    fn test_turn_beyond_trajectory_rejected() {
        let result = AnimationController::new(&TrajectoryParams {
            steps_number: 10,
            turn_begin: usize::MAX,
            turn_end: 5,
            ..TrajectoryParams::default()
        });
        assert!(matches!(result, Err(SceneError::InvalidParameter(_))));
    }
}
