//! Light parameter blocks
//!
//! Lights follow the fixed-function model: a homogeneous position (w = 1
//! for positional lights), separate ambient/diffuse/specular colors and a
//! spot cone. A cutoff of 180 degrees disables the cone and makes the light
//! omnidirectional.

use crate::foundation::math::{Vec3, Vec4};

/// Cutoff value that turns a spot light into an omnidirectional one
pub const OMNIDIRECTIONAL_CUTOFF: f32 = 180.0;

/// Hardware light unit a descriptor is programmed into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightId {
    /// Scene-wide fill light
    Fill,
    /// Spot light attached to the designated lamp post
    Accent,
}

/// Full parameter set for one light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightDescriptor {
    /// Position in the frame current when the light is applied
    pub position: Vec4,
    /// Ambient color
    pub ambient: Vec4,
    /// Diffuse color
    pub diffuse: Vec4,
    /// Specular color
    pub specular: Vec4,
    /// Cone half-angle in degrees, 180 for omnidirectional
    pub spot_cutoff: f32,
    /// Cone axis
    pub spot_direction: Vec3,
    /// Intensity falloff inside the cone
    pub spot_exponent: f32,
}

impl LightDescriptor {
    /// Red spot light hanging under a lamp head
    ///
    /// Position is local to the lamp, so the light follows whatever transform
    /// is current when it is applied.
    pub fn accent_spot() -> Self {
        Self {
            position: Vec4::new(0.0, 0.0, 0.0, 1.0),
            ambient: Vec4::new(0.2, 0.0, 0.0, 1.0),
            diffuse: Vec4::new(1.0, 0.0, 0.0, 1.0),
            specular: Vec4::new(1.0, 0.2, 0.2, 1.0),
            spot_cutoff: 40.0,
            spot_direction: Vec3::new(0.0, -1.0, 0.0),
            spot_exponent: 5.0,
        }
    }

    /// Yellow-tinted fill light above the street
    pub fn fill(ambient: Vec3) -> Self {
        Self {
            position: Vec4::new(0.0, 1500.0, 0.0, 1.0),
            ambient: ambient.push(1.0),
            diffuse: Vec4::new(1.0, 1.0, 0.6, 1.0),
            specular: Vec4::new(0.8, 0.8, 0.5, 1.0),
            spot_cutoff: OMNIDIRECTIONAL_CUTOFF,
            spot_direction: Vec3::new(0.0, -1.0, 0.0),
            spot_exponent: 0.0,
        }
    }

    /// Whether the cone is disabled
    pub fn is_omnidirectional(&self) -> bool {
        self.spot_cutoff >= OMNIDIRECTIONAL_CUTOFF
    }

    /// Replace the ambient RGB, keeping alpha
    pub fn with_ambient(mut self, rgb: Vec3) -> Self {
        self.ambient = rgb.push(self.ambient.w);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accent_is_narrow_spot() {
        let accent = LightDescriptor::accent_spot();
        assert!(!accent.is_omnidirectional());
        assert_eq!(accent.spot_cutoff, 40.0);
        assert_eq!(accent.position.w, 1.0);
        assert!(accent.diffuse.x > accent.diffuse.y);
    }

    #[test]
    fn test_fill_is_omnidirectional() {
        let fill = LightDescriptor::fill(Vec3::new(0.1, 0.2, 0.3));
        assert!(fill.is_omnidirectional());
        assert_eq!(fill.ambient, Vec4::new(0.1, 0.2, 0.3, 1.0));

        let retinted = fill.with_ambient(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(retinted.ambient, Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(retinted.diffuse, fill.diffuse);
    }
}
