//! Fixed placement of every scene element
//!
//! World units; angles in degrees. Nested offsets (buildings, lamp posts)
//! are relative to the transform of the enclosing group.

use crate::foundation::math::Vec3;

/// Ground half-extents along X and Z
pub const GROUND_SCALE: (f32, f32) = (1000.0, 1500.0);

/// Ground color
pub const GROUND_COLOR: Vec3 = Vec3::new(0.1, 0.1, 0.1);

/// Road width across X; the road runs the full ground length along Z
pub const ROAD_WIDTH: f32 = 300.0;

/// Road lift above the ground plane to keep it out of the depth fight
pub const ROAD_ELEVATION: f32 = 0.5;

/// Road color
pub const ROAD_COLOR: Vec3 = Vec3::new(0.18, 0.18, 0.18);

/// Camera pivot height offset
pub const CAMERA_HEIGHT_OFFSET: f32 = -50.0;

/// First building's center
pub const BUILDING_ORIGIN: Vec3 = Vec3::new(-700.0, 700.0, 600.0);

/// Building half-extents
pub const BUILDING_SCALE: Vec3 = Vec3::new(250.0, 700.0, 350.0);

/// Steps between consecutive buildings, in building-scaled units
pub const BUILDING_STEPS: [Vec3; 3] = [
    Vec3::new(5.6, 0.0, 0.0),
    Vec3::new(0.0, 0.0, -4.8),
    Vec3::new(-5.6, 0.0, 0.0),
];

/// Building color, used under the concrete texture
pub const BUILDING_COLOR: Vec3 = Vec3::new(0.22, 0.28, 0.31);

/// Origin of the traffic light, motorcycle and lamp post group
pub const MODEL_GROUP_OFFSET: Vec3 = Vec3::new(-250.0, 0.0, 80.0);

/// Uniform traffic light model scale
pub const TRAFFIC_LIGHT_SCALE: f32 = 15.0;

/// Motorcycle rest position inside the model group
pub const MOTORCYCLE_BASE: Vec3 = Vec3::new(100.0, 10.0, 100.0);

/// Motorcycle heading at rest
pub const MOTORCYCLE_BASE_HEADING: f32 = 180.0;

/// Uniform motorcycle model scale
pub const MOTORCYCLE_SCALE: f32 = 0.01;

/// Distance along Z between consecutive lamp posts
pub const LAMP_POST_SPACING: f32 = 400.0;

/// Lamp post radius
pub const POST_RADIUS: f32 = 4.5;

/// Lamp post height at scale 1.0
pub const POST_HEIGHT: f32 = 165.0;

/// Post subdivisions around its axis
pub const POST_SLICES: u32 = 100;

/// Post subdivisions along its axis
pub const POST_STACKS: u32 = 20;

/// Post color, used under the wood texture
pub const POST_COLOR: Vec3 = Vec3::new(0.3, 0.3, 0.3);

/// Lamp head scale
pub const LAMP_EDGE: f32 = 7.5;

/// Lamp head color
pub const LAMP_COLOR: Vec3 = Vec3::new(0.65, 0.35, 0.0);

/// Camera pitch bounds
pub const ROTATION_X_RANGE: (f32, f32) = (-15.0, 55.0);

/// Camera rotation step per command
pub const ROTATION_STEP: f32 = 5.0;

/// Camera distance change per zoom command
pub const ZOOM_STEP: f32 = 125.0;

/// Closest the camera may zoom in
pub const MIN_DISTANCE: f32 = 50.0;

/// Ground quad corners before scaling
pub const GROUND_CORNERS: [Vec3; 4] = [
    Vec3::new(1.0, 0.0, -1.0),
    Vec3::new(-1.0, 0.0, -1.0),
    Vec3::new(-1.0, 0.0, 1.0),
    Vec3::new(1.0, 0.0, 1.0),
];

/// Ground quad in world units
pub fn ground_quad() -> [Vec3; 4] {
    GROUND_CORNERS.map(|corner| Vec3::new(corner.x * GROUND_SCALE.0, corner.y, corner.z * GROUND_SCALE.1))
}

/// Road quad in world units, centered on the street axis
pub fn road_quad() -> [Vec3; 4] {
    let half = ROAD_WIDTH / 2.0;
    GROUND_CORNERS.map(|corner| Vec3::new(corner.x * half, ROAD_ELEVATION, corner.z * GROUND_SCALE.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_road_fits_on_ground() {
        let ground = ground_quad();
        let road = road_quad();
        for (g, r) in ground.iter().zip(road.iter()) {
            assert!(r.x.abs() <= g.x.abs());
            assert_eq!(r.z, g.z);
            assert!(r.y > g.y);
        }
    }
}
