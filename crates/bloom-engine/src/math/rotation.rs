//! 3D rotation helpers used by the growth generators and the view transform.
//!
//! All angles are radians. Axes need not be normalized on input.

use glam::DVec3;

use super::rng::Rng;

/// Rotate `point` about `axis` by `angle` (Rodrigues' rotation formula).
///
/// A zero-length axis leaves the point unchanged.
pub fn rotate_around_axis(point: DVec3, axis: DVec3, angle: f64) -> DVec3 {
    let Some(k) = axis.try_normalize() else {
        return point;
    };
    let (sin, cos) = angle.sin_cos();
    point * cos + k.cross(point) * sin + k * k.dot(point) * (1.0 - cos)
}

#[inline]
pub fn rotate_x(point: DVec3, angle: f64) -> DVec3 {
    rotate_around_axis(point, DVec3::X, angle)
}

#[inline]
pub fn rotate_y(point: DVec3, angle: f64) -> DVec3 {
    rotate_around_axis(point, DVec3::Y, angle)
}

#[inline]
pub fn rotate_z(point: DVec3, angle: f64) -> DVec3 {
    rotate_around_axis(point, DVec3::Z, angle)
}

/// Tilt `vector` by three independent angles drawn from `[-max_angle, max_angle]`,
/// applied about X, then Y, then Z.
///
/// Not a uniform cone sample; the X∘Y∘Z order is what gives stems and petals
/// their characteristic lean, so keep it.
pub fn rotate_random_cone(vector: DVec3, max_angle: f64, rng: &mut Rng) -> DVec3 {
    let ax = rng.signed(max_angle);
    let ay = rng.signed(max_angle);
    let az = rng.signed(max_angle);
    rotate_z(rotate_y(rotate_x(vector, ax), ay), az)
}

/// Project `v` onto the plane spanned by `a` and `b`, then rotate it inside that
/// plane by `angle` about the plane normal.
///
/// Returns the projection unrotated when `a` and `b` are parallel.
pub fn rotate_in_plane(a: DVec3, b: DVec3, v: DVec3, angle: f64) -> DVec3 {
    let normal = a.cross(b).normalize_or_zero();
    let projection = v - normal * v.dot(normal);
    let (sin, cos) = angle.sin_cos();
    projection * cos + normal.cross(projection) * sin
}

/// A unit vector perpendicular to `direction`.
///
/// Crosses with `(1, 0, -x/z)`, which lies in the horizontal-ish plane for
/// mostly-vertical stems. Falls back to a world axis when `z` is ~0.
pub fn perpendicular_basis(direction: DVec3) -> DVec3 {
    if direction.z.abs() > 1e-9 {
        let helper = DVec3::new(1.0, 0.0, -direction.x / direction.z);
        if let Some(n) = direction.cross(helper).try_normalize() {
            return n;
        }
    }
    let helper = if direction.normalize_or_zero().dot(DVec3::Z).abs() < 0.9 {
        DVec3::Z
    } else {
        DVec3::X
    };
    direction.cross(helper).try_normalize().unwrap_or(DVec3::X)
}
