//! Mutable scene state: camera, user config and the redraw flag

use crate::core::SceneConfig;
use crate::scene::layout::{MIN_DISTANCE, ROTATION_STEP, ROTATION_X_RANGE, ZOOM_STEP};

/// Orbit camera around the street
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Pitch in degrees, kept inside [`ROTATION_X_RANGE`]
    pub rotation_x: f32,
    /// Yaw in degrees
    pub rotation_y: f32,
    /// Distance from the pivot
    pub distance: f32,
}

impl CameraState {
    /// Level camera at `distance`
    pub const fn new(distance: f32) -> Self {
        Self {
            rotation_x: 0.0,
            rotation_y: 0.0,
            distance,
        }
    }

    /// Pitch by `steps` rotation steps, clamped to the allowed range
    pub fn pitch(&mut self, steps: i8) {
        let (min, max) = ROTATION_X_RANGE;
        self.rotation_x = (self.rotation_x + f32::from(steps) * ROTATION_STEP).clamp(min, max);
    }

    /// Yaw by `steps` rotation steps
    pub fn yaw(&mut self, steps: i8) {
        self.rotation_y += f32::from(steps) * ROTATION_STEP;
    }

    /// Move one zoom step closer, never nearer than [`MIN_DISTANCE`]
    pub fn zoom_in(&mut self) {
        self.distance = (self.distance - ZOOM_STEP).max(MIN_DISTANCE);
    }

    /// Move one zoom step away
    pub fn zoom_out(&mut self) {
        self.distance += ZOOM_STEP;
    }
}

/// Everything the composer reads besides the animation
#[derive(Debug, Clone)]
pub struct SceneState {
    /// Camera placement
    pub camera: CameraState,
    /// User-tunable values
    pub config: SceneConfig,
    dirty: bool,
}

impl SceneState {
    /// Fresh state; starts dirty so the first frame gets drawn
    pub const fn new(config: SceneConfig, initial_distance: f32) -> Self {
        Self {
            camera: CameraState::new(initial_distance),
            config,
            dirty: true,
        }
    }

    /// Request a redraw
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether a redraw is pending
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and clear the redraw flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = CameraState::new(2500.0);
        for _ in 0..20 {
            camera.pitch(1);
        }
        assert_relative_eq!(camera.rotation_x, 55.0);
        for _ in 0..20 {
            camera.pitch(-1);
        }
        assert_relative_eq!(camera.rotation_x, -15.0);
    }

    #[test]
    fn test_yaw_is_free() {
        let mut camera = CameraState::new(2500.0);
        for _ in 0..80 {
            camera.yaw(1);
        }
        assert_relative_eq!(camera.rotation_y, 400.0);
    }

    #[test]
    fn test_zoom_bounds() {
        let mut camera = CameraState::new(300.0);
        camera.zoom_in();
        assert_relative_eq!(camera.distance, 175.0);
        camera.zoom_in();
        camera.zoom_in();
        assert_relative_eq!(camera.distance, MIN_DISTANCE);
        camera.zoom_out();
        assert_relative_eq!(camera.distance, MIN_DISTANCE + ZOOM_STEP);
    }

    #[test]
    fn test_dirty_flag() {
        let mut state = SceneState::new(SceneConfig::default(), 2500.0);
        assert!(state.take_dirty());
        assert!(!state.take_dirty());
        state.mark_dirty();
        assert!(state.is_dirty());
    }
}
