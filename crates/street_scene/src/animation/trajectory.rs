//! Keyframe trajectory generation
//!
//! Builds the four per-frame offset tables that script the motorcycle
//! maneuver: a straight approach, a turn between `turn_begin` and
//! `turn_end`, and a straight departure. Each table is produced by walking
//! the frame index with a running accumulator and a guarded increment, so a
//! value holds steady on frames where its guard does not fire.

use serde::{Serialize, Deserialize};

use crate::error::SceneError;

/// Frames after `turn_begin` before sideways travel starts
pub const TURN_X_DELAY: i64 = 3;

/// Frames before `turn_end` at which forward travel stops
pub const TURN_Z_LEAD: i64 = 8;

/// Margin around the turn midpoint where the lean holds still
pub const LEAN_MARGIN: i64 = 5;

/// Frames after `turn_end` the bike keeps straightening up
pub const LEAN_RECOVERY: i64 = 10;

/// Parameters of the scripted maneuver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryParams {
    /// Number of frames in every table
    pub steps_number: usize,
    /// Frame at which the turn starts
    pub turn_begin: usize,
    /// Frame at which the turn ends
    pub turn_end: usize,
    /// Sideways travel per frame (world units)
    pub translate_x_step: f32,
    /// Forward travel per frame (world units)
    pub translate_z_step: f32,
    /// Heading change per frame while turning (degrees)
    pub rotate_y_step: f32,
    /// Lean change per frame entering and leaving the turn (degrees)
    pub rotate_z_step: f32,
}

impl Default for TrajectoryParams {
    fn default() -> Self {
        Self {
            steps_number: 230,
            turn_begin: 30,
            turn_end: 75,
            translate_x_step: 6.0,
            translate_z_step: 6.0,
            rotate_y_step: 2.0,
            rotate_z_step: 1.0,
        }
    }
}

impl TrajectoryParams {
    /// Midpoint of the turn interval
    pub const fn turn_middle(&self) -> usize {
        self.turn_begin / 2 + self.turn_end / 2 + (self.turn_begin % 2 + self.turn_end % 2) / 2
    }

    /// Reject parameters the animation cannot play back
    ///
    /// The generator itself accepts anything; this is the configuration
    /// boundary check.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.steps_number == 0 {
            return Err(SceneError::InvalidParameter(
                "trajectory needs at least one step".to_string(),
            ));
        }

        for (name, frame) in [("turn_begin", self.turn_begin), ("turn_end", self.turn_end)] {
            if frame > self.steps_number {
                return Err(SceneError::InvalidParameter(format!(
                    "{name} must not exceed steps_number ({}), got {frame}",
                    self.steps_number
                )));
            }
        }

        let steps = [
            ("translate_x_step", self.translate_x_step),
            ("translate_z_step", self.translate_z_step),
            ("rotate_y_step", self.rotate_y_step),
            ("rotate_z_step", self.rotate_z_step),
        ];
        for (name, value) in steps {
            if !value.is_finite() || value < 0.0 {
                return Err(SceneError::InvalidParameter(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }

        Ok(())
    }
}

/// Offsets read from the trajectory for a single frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameOffset {
    /// Accumulated sideways travel
    pub translate_x: f32,
    /// Accumulated forward travel
    pub translate_z: f32,
    /// Accumulated heading (degrees)
    pub rotate_y: f32,
    /// Current lean (degrees)
    pub rotate_z: f32,
}

/// Four parallel per-frame tables describing the maneuver
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    translate_x: Vec<f32>,
    translate_z: Vec<f32>,
    rotate_y: Vec<f32>,
    rotate_z: Vec<f32>,
}

impl Trajectory {
    /// Generate all four tables from the parameters
    pub fn generate(params: &TrajectoryParams) -> Self {
        let n = params.steps_number;
        let begin = to_signed(params.turn_begin);
        let end = to_signed(params.turn_end);
        let middle = to_signed(params.turn_middle());

        let translate_x = accumulate(n, |i, val| {
            if i > begin.saturating_add(TURN_X_DELAY) {
                *val += params.translate_x_step;
            }
        });

        let translate_z = accumulate(n, |i, val| {
            if i < end.saturating_sub(TURN_Z_LEAD) {
                *val += params.translate_z_step;
            }
        });

        let rotate_y = accumulate(n, |i, val| {
            if i > begin && i < end {
                *val += params.rotate_y_step;
            }
        });

        let rotate_z = accumulate(n, |i, val| {
            if i > begin.saturating_sub(LEAN_MARGIN) && i < middle.saturating_sub(LEAN_MARGIN) {
                *val -= params.rotate_z_step;
            } else if i > middle.saturating_add(LEAN_MARGIN) && i < end.saturating_add(LEAN_RECOVERY) {
                *val += params.rotate_z_step;
            }
        });

        log::debug!(
            "Generated trajectory: {} steps, turn {}..{}",
            n,
            params.turn_begin,
            params.turn_end
        );

        Self {
            translate_x,
            translate_z,
            rotate_y,
            rotate_z,
        }
    }

    /// Number of frames in every table
    pub fn len(&self) -> usize {
        self.translate_x.len()
    }

    /// Whether the tables are empty
    pub fn is_empty(&self) -> bool {
        self.translate_x.is_empty()
    }

    /// Offsets at `frame`, `None` past the end of the tables
    pub fn offset_at(&self, frame: usize) -> Option<FrameOffset> {
        Some(FrameOffset {
            translate_x: *self.translate_x.get(frame)?,
            translate_z: *self.translate_z.get(frame)?,
            rotate_y: *self.rotate_y.get(frame)?,
            rotate_z: *self.rotate_z.get(frame)?,
        })
    }

    /// Sideways travel table
    pub fn translate_x(&self) -> &[f32] {
        &self.translate_x
    }

    /// Forward travel table
    pub fn translate_z(&self) -> &[f32] {
        &self.translate_z
    }

    /// Heading table
    pub fn rotate_y(&self) -> &[f32] {
        &self.rotate_y
    }

    /// Lean table
    pub fn rotate_z(&self) -> &[f32] {
        &self.rotate_z
    }
}

fn to_signed(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Walk `0..n` with a running accumulator, storing it after every step
fn accumulate(n: usize, mut step: impl FnMut(i64, &mut f32)) -> Vec<f32> {
    let mut val = 0.0;
    (0..n)
        .map(|i| {
            step(to_signed(i), &mut val);
            val
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(steps_number: usize, turn_begin: usize, turn_end: usize) -> TrajectoryParams {
        TrajectoryParams {
            steps_number,
            turn_begin,
            turn_end,
            ..TrajectoryParams::default()
        }
    }

    #[test]
    fn test_tables_share_length() {
        for steps in [76, 100, 230, 500] {
            let trajectory = Trajectory::generate(&params(steps, 30, 75));
            assert_eq!(trajectory.len(), steps);
            assert_eq!(trajectory.translate_x().len(), steps);
            assert_eq!(trajectory.translate_z().len(), steps);
            assert_eq!(trajectory.rotate_y().len(), steps);
            assert_eq!(trajectory.rotate_z().len(), steps);
        }
    }

    #[test]
    fn test_translations_are_non_decreasing() {
        let cases = [
            (76, 30, 75),
            (100, 30, 75),
            (230, 30, 75),
            (500, 30, 75),
            (60, 10, 30),
            (20, 5, 10),
        ];
        for (steps, begin, end) in cases {
            let trajectory = Trajectory::generate(&params(steps, begin, end));

            for table in [trajectory.translate_x(), trajectory.translate_z()] {
                assert!(
                    table.windows(2).all(|pair| pair[1] >= pair[0]),
                    "steps {steps}, turn {begin}..{end}"
                );
            }
        }
    }

    #[test]
    fn test_phases_of_the_turn() {
        let trajectory = Trajectory::generate(&params(230, 30, 75));
        let rotate_y = trajectory.rotate_y();

        // Approach: no heading change up to and including turn_begin
        assert_eq!(rotate_y[29], rotate_y[0]);
        assert_eq!(rotate_y[30], 0.0);
        // Turn
        assert!(rotate_y[40] > rotate_y[29]);
        // Departure: heading frozen after turn_end
        assert_eq!(rotate_y[75], rotate_y[229]);
        assert_relative_eq!(rotate_y[229], 44.0 * 2.0);
    }

    #[test]
    fn test_translate_guards() {
        let trajectory = Trajectory::generate(&params(230, 30, 75));
        let x = trajectory.translate_x();
        let z = trajectory.translate_z();

        // Sideways travel starts after turn_begin + 3
        assert_eq!(x[33], 0.0);
        assert_relative_eq!(x[34], 6.0);
        // Forward travel stops before turn_end - 8
        assert_relative_eq!(z[66], 67.0 * 6.0);
        assert_eq!(z[67], z[229]);
    }

    #[test]
    fn test_lean_into_and_out_of_turn() {
        let trajectory = Trajectory::generate(&params(230, 30, 75));
        let lean = trajectory.rotate_z();
        // middle = 52: lean goes negative on 26..=46, holds, recovers on 58..=84
        assert_eq!(lean[25], 0.0);
        assert_relative_eq!(lean[46], -21.0);
        assert_eq!(lean[46], lean[57]);
        assert_relative_eq!(lean[84], -21.0 + 27.0);
        assert_eq!(lean[84], lean[229]);
    }

    #[test]
    fn test_degenerate_parameters_do_not_panic() {
        for (steps, begin, end) in [(0, 0, 0), (1, 0, 0), (10, 8, 2), (50, 40, 40), (3, 0, 1)] {
            let trajectory = Trajectory::generate(&params(steps, begin, end));
            assert_eq!(trajectory.len(), steps);
        }

        let inverted = Trajectory::generate(&params(50, 40, 10));
        assert!(inverted.rotate_y().iter().all(|value| *value == 0.0));
    }

    #[test]
    fn test_huge_turn_frames_do_not_overflow() {
        for (begin, end) in [(usize::MAX, 5), (5, usize::MAX), (usize::MAX, usize::MAX)] {
            let trajectory = Trajectory::generate(&params(10, begin, end));
            assert_eq!(trajectory.len(), 10);
        }
        assert_eq!(params(10, usize::MAX, usize::MAX).turn_middle(), usize::MAX);
        assert_eq!(params(10, 3, 4).turn_middle(), 3);
        assert_eq!(params(10, 31, 75).turn_middle(), 53);
    }

    #[test]
    fn test_validate_rejects_turn_past_the_end() {
        assert!(params(10, 10, 10).validate().is_ok());
        for (begin, end) in [(11, 5), (5, 11), (usize::MAX, 5)] {
            assert!(matches!(
                params(10, begin, end).validate(),
                Err(SceneError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let p = params(230, 30, 75);
        assert_eq!(Trajectory::generate(&p), Trajectory::generate(&p));
    }

    #[test]
    fn test_offset_at_bounds() {
        let trajectory = Trajectory::generate(&params(10, 2, 6));
        assert!(trajectory.offset_at(9).is_some());
        assert!(trajectory.offset_at(10).is_none());
    }

    #[test]
    fn test_validate_rejects_bad_steps() {
        assert!(TrajectoryParams::default().validate().is_ok());
        assert!(params(0, 0, 0).validate().is_err());

        let negative = TrajectoryParams {
            rotate_y_step: -1.0,
            ..TrajectoryParams::default()
        };
        assert!(negative.validate().is_err());

        let not_finite = TrajectoryParams {
            translate_x_step: f32::NAN,
            ..TrajectoryParams::default()
        };
        assert!(not_finite.validate().is_err());
    }
}
