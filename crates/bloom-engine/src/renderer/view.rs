use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::math::{project_to_2d, rotate_x, rotate_y, rotate_z, Perlin};

/// Scene orientation and camera used for every draw call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewParams {
    /// Rotation about X (radians), applied second.
    pub angle_x: f64,
    /// Rotation about Y (radians), applied first.
    pub angle_y: f64,
    /// Rotation about Z (radians), applied last.
    pub angle_z: f64,
    /// Camera position in world space.
    pub camera: DVec3,
    /// Focal length term of the projection.
    pub fov: f64,
    /// Screen-space magnification.
    pub zoom: f64,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            angle_x: 0.0,
            angle_y: 0.0,
            angle_z: 0.0,
            camera: DVec3::new(0.0, 0.0, -200.0),
            fov: 1000.0,
            zoom: 3.4,
        }
    }
}

impl ViewParams {
    /// Rotate a world point into view orientation: Y, then X, then Z.
    /// The order is not commutative and must not change.
    pub fn orient(&self, point: DVec3) -> DVec3 {
        let p = rotate_y(point, self.angle_y);
        let p = rotate_x(p, self.angle_x);
        rotate_z(p, self.angle_z)
    }

    /// Orient then project to screen space.
    pub fn project(&self, point: DVec3) -> DVec2 {
        project_to_2d(self.orient(point), self.camera, self.fov, self.zoom)
    }

    /// Squared distance from the camera, used for painter's-order sorting.
    #[inline]
    pub fn depth_sq(&self, point: DVec3) -> f64 {
        point.distance_squared(self.camera)
    }
}

/// Everything a particle needs to draw itself for one frame.
pub struct DrawContext<'a> {
    pub view: &'a ViewParams,
    /// Frame counter, the time axis of brush spin noise.
    pub frame: u64,
    pub noise: &'a Perlin,
}
