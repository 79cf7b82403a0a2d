pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod assets;
pub mod extensions;
pub mod math;

// Re-export key types at crate root for convenience
pub use api::sketch::{Sketch, SketchContext, GardenConfig};
pub use api::types::{BrushHandle, Rgba};
pub use components::particle::{Anchor, Particle, ParticleConfig, TickContext, TrailPoint};
pub use core::garden::Garden;
pub use core::scene::ParticleScene;
pub use core::time::FrameClock;
pub use renderer::{
    DrawContext, Painter, RenderType, Stamp, StrokeBuffer, StrokeFrame, StrokeInstance,
    StrokeKind, ViewParams,
};
pub use assets::manifest::{BrushDescriptor, BrushManifest};
pub use assets::registry::{BrushProvider, BrushRegistry};
pub use systems::field::{plant_field, PlantingLayout, PlantingRequest};
pub use systems::growth::{
    fulfil, generate_flower, generate_flower_end, generate_stem, FlowerParams, Generation,
    GrowthContext, SpawnRequest, SpeciesProfile,
};
pub use math::{Perlin, Rng};

// Extensions: decoupled optional helpers
pub use extensions::{Easing, lerp, remap, lens};
