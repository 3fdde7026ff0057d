//! Input commands routed to the scene by the host shell

use crate::core::ColorChannel;

/// One user action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneCommand {
    /// Tilt the camera up one step
    TiltUp,
    /// Tilt the camera down one step
    TiltDown,
    /// Orbit left one step
    TurnLeft,
    /// Orbit right one step
    TurnRight,
    /// Move the camera closer
    ZoomIn,
    /// Move the camera away
    ZoomOut,
    /// Play the motorcycle maneuver
    StartAnimation,
    /// Change lamp post height scale
    SetLampScale(f32),
    /// Change one fill-light channel
    SetChannel(ColorChannel, f32),
    /// Change playback velocity
    SetVelocity(f32),
}
