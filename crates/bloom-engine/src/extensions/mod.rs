// extensions/mod.rs
//
// Optional helpers decoupled from particles and scene.

pub mod easing;

pub use easing::{Easing, lerp, remap, lens};
