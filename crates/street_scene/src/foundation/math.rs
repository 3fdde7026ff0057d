//! Math utilities and types
//!
//! Provides the vector and matrix aliases used by the scene, plus the
//! fixed-function style helpers (degree rotations, perspective projection)
//! the composer and render backends rely on.

pub use nalgebra::{
    Vector3, Vector4,
    Matrix4,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (homogeneous positions, RGBA colors)
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Clamp a value into `[0, 1]`, mapping NaN to 0
    pub fn clamp_unit(value: f32) -> f32 {
        if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0)
        }
    }
}

/// Extension trait for Mat4 with fixed-function style constructors
pub trait Mat4Ext {
    /// Rotation of `degrees` around an arbitrary axis
    ///
    /// A zero-length axis yields the identity, matching how legacy
    /// fixed-function pipelines ignore degenerate rotations.
    fn rotation_degrees(degrees: f32, axis: Vec3) -> Mat4;

    /// Right-handed OpenGL style perspective projection (clip z in [-1, 1])
    fn perspective_gl(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_degrees(degrees: f32, axis: Vec3) -> Mat4 {
        Unit::try_new(axis, f32::EPSILON).map_or_else(Mat4::identity, |axis| {
            Mat4::from_axis_angle(&axis, utils::deg_to_rad(degrees))
        })
    }

    fn perspective_gl(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        nalgebra::Perspective3::new(aspect, utils::deg_to_rad(fov_y_degrees), near, far)
            .to_homogeneous()
    }
}
