//! Growth generators: stem → flower → petals/stamens → pollen.
//!
//! Generators never touch the scene. They return new particles, and a dying
//! particle hands back `SpawnRequest`s that the scene fulfils after the
//! frame's updates. The chain has a fixed depth; pollen has no end hook.

pub mod flower;
pub mod pollen;
pub mod profile;
pub mod stem;

use std::rc::Rc;

use crate::api::types::BrushHandle;
use crate::assets::registry::BrushProvider;
use crate::components::particle::{Anchor, Particle};
use crate::math::{Perlin, Rng};

pub use flower::{generate_flower, FlowerParams};
pub use pollen::generate_flower_end;
pub use profile::SpeciesProfile;
pub use stem::generate_stem;

/// Which generator a spawn request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    /// Petals (and stamens, if the species has them) around the anchor.
    Flower,
    /// A single pollen mote at a stamen tip.
    Pollen,
}

/// "Grow the next generation here", emitted by a dying particle.
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    pub generation: Generation,
    pub anchor: Anchor,
    /// Ticks the spawned particles wait before becoming active.
    pub pre_delay: i32,
    pub profile: Rc<SpeciesProfile>,
}

/// Collaborators every generator needs, passed in explicitly.
pub struct GrowthContext<'a> {
    pub frame: u64,
    pub noise: &'a Perlin,
    pub rng: &'a mut Rng,
    pub brushes: &'a mut dyn BrushProvider,
}

/// Run the generator a request names.
pub fn fulfil(request: &SpawnRequest, ctx: &mut GrowthContext) -> Vec<Particle> {
    match request.generation {
        Generation::Flower => {
            generate_flower(&request.anchor, &request.profile, request.pre_delay, ctx)
        }
        Generation::Pollen => generate_flower_end(&request.anchor, &request.profile, ctx)
            .into_iter()
            .collect(),
    }
}

/// Fresh decorrelation id for a new particle's noise phases.
#[inline]
pub(crate) fn next_random_id(rng: &mut Rng) -> f64 {
    rng.range(0.0, 1000.0)
}

/// Draw one palette from `palettes`, then two brushes from it.
/// Returns None (after logging) when either brush is unavailable.
pub(crate) fn pick_brush_pair(
    palettes: &[String],
    what: &str,
    ctx: &mut GrowthContext,
) -> Option<(BrushHandle, BrushHandle)> {
    let Some(palette) = ctx.rng.pick(palettes).cloned() else {
        log::warn!("{}: no palettes configured, skipping", what);
        return None;
    };
    let first = ctx.brushes.pick(&palette, ctx.rng);
    let second = ctx.brushes.pick(&palette, ctx.rng);
    match (first, second) {
        (Some(a), Some(b)) => Some((a, b)),
        _ => {
            log::warn!("{}: palette '{}' has no brushes, skipping", what, palette);
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn anchor() -> Anchor {
        Anchor {
            position: DVec3::new(0.0, 100.0, 0.0),
            origin: DVec3::new(0.0, 300.0, 0.0),
            direction: DVec3::new(0.1, -1.5, 0.2),
            random_id: 42.0,
            lifespan: -1,
            original_lifespan: 120,
            radius: 10.0,
        }
    }

    #[test]
    fn fulfil_routes_by_generation() {
        let noise = Perlin::new(1);
        let mut rng = Rng::new(2);
        let mut brushes = testing::full_registry();
        let mut ctx = GrowthContext { frame: 0, noise: &noise, rng: &mut rng, brushes: &mut brushes };
        let profile = Rc::new(SpeciesProfile::lycoris());

        let flower = SpawnRequest {
            generation: Generation::Flower,
            anchor: anchor(),
            pre_delay: 0,
            profile: profile.clone(),
        };
        assert!(fulfil(&flower, &mut ctx).len() >= 20);

        let pollen = SpawnRequest { generation: Generation::Pollen, ..flower };
        assert_eq!(fulfil(&pollen, &mut ctx).len(), 1);
    }

    #[test]
    fn brush_pair_none_when_palette_empty() {
        let noise = Perlin::new(1);
        let mut rng = Rng::new(2);
        let mut brushes = crate::assets::registry::BrushRegistry::new();
        let mut ctx = GrowthContext { frame: 0, noise: &noise, rng: &mut rng, brushes: &mut brushes };
        assert!(pick_brush_pair(&["red".to_string()], "petal", &mut ctx).is_none());
        assert!(pick_brush_pair(&[], "petal", &mut ctx).is_none());
    }
}
