//! Scripted keyframe animation
//!
//! The trajectory module precomputes the per-frame offset tables; the
//! controller plays them back on a periodic tick.

pub mod trajectory;
pub mod controller;

pub use trajectory::{
    Trajectory, TrajectoryParams, FrameOffset,
    TURN_X_DELAY, TURN_Z_LEAD, LEAN_MARGIN, LEAN_RECOVERY,
};
pub use controller::{
    AnimationController, AnimationState, AnimationPhase,
    BASE_TICK_INTERVAL, SAFETY_MARGIN_FRAMES,
};
