//! Math primitives: rotations, projection, noise and randomness.
//! Vectors are `glam::DVec3` / `DVec2` throughout.

pub mod noise;
pub mod projection;
pub mod rng;
pub mod rotation;

pub use noise::Perlin;
pub use projection::project_to_2d;
pub use rng::Rng;
pub use rotation::{
    perpendicular_basis, rotate_around_axis, rotate_in_plane, rotate_random_cone, rotate_x,
    rotate_y, rotate_z,
};
