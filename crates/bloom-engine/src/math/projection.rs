use glam::{DVec2, DVec3};

/// Perspective-style projection of a point onto the screen plane.
///
/// `scale = fov / (fov + z)` relative to the camera. Points with negative
/// relative depth come out larger; nothing is clipped here, that is left to
/// whoever rasterizes the result.
pub fn project_to_2d(point: DVec3, camera: DVec3, fov: f64, zoom: f64) -> DVec2 {
    let rel = point - camera;
    let scale = fov / (fov + rel.z);
    DVec2::new(rel.x * scale * zoom, rel.y * scale * zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_scales_linearly() {
        let p = DVec3::new(12.0, -7.5, 40.0);
        let cam = DVec3::new(0.0, 0.0, -200.0);
        let one = project_to_2d(p, cam, 1000.0, 1.0);
        let two = project_to_2d(p, cam, 1000.0, 2.0);
        assert_eq!(two.x, one.x * 2.0);
        assert_eq!(two.y, one.y * 2.0);
    }

    #[test]
    fn point_at_camera_depth_is_unscaled() {
        let p = DVec3::new(10.0, 20.0, 0.0);
        let projected = project_to_2d(p, DVec3::ZERO, 1000.0, 1.0);
        assert_eq!(projected, DVec2::new(10.0, 20.0));
    }

    #[test]
    fn far_points_shrink_near_points_grow() {
        let cam = DVec3::ZERO;
        let far = project_to_2d(DVec3::new(10.0, 0.0, 500.0), cam, 1000.0, 1.0);
        let near = project_to_2d(DVec3::new(10.0, 0.0, -500.0), cam, 1000.0, 1.0);
        assert!(far.x < 10.0);
        assert!(near.x > 10.0, "behind the focal plane must magnify, got {}", near.x);
    }
}
