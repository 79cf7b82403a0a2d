use super::profile::{sample, SpeciesProfile};
use super::{next_random_id, GrowthContext};
use crate::components::particle::{Anchor, Particle, ParticleConfig};
use crate::extensions::easing::lens;
use crate::math::rotate_random_cone;
use crate::renderer::strategy::RenderType;

/// The terminal generation: one short-lived pollen mote thrown off a stamen
/// tip. It has no end hook, so the chain stops here.
pub fn generate_flower_end(
    anchor: &Anchor,
    profile: &SpeciesProfile,
    ctx: &mut GrowthContext,
) -> Option<Particle> {
    let pollen = profile.pollen.as_ref()?;

    let brush = ctx.brushes.pick(&pollen.palette, ctx.rng);
    let brush2 = ctx.brushes.pick(&pollen.palette, ctx.rng);
    let (Some(brush), Some(brush2)) = (brush, brush2) else {
        log::warn!("pollen: palette '{}' has no brushes, skipping", pollen.palette);
        return None;
    };

    let radius = sample(ctx.rng, pollen.radius);
    let heading = anchor.direction.normalize_or_zero() * sample(ctx.rng, pollen.speed);
    let spread = ctx.rng.signed(pollen.scatter);
    let velocity = rotate_random_cone(heading, spread, ctx.rng);
    let easing = pollen.easing;

    let particle = ParticleConfig::new()
        .with_position(anchor.position)
        .with_velocity(velocity)
        .with_radius(radius)
        .with_lifespan((radius * pollen.lifespan_factor).round() as i32)
        .with_radius_shrink(pollen.radius_shrink)
        .with_velocity_shrink(pollen.velocity_shrink)
        .with_color(pollen.color)
        .with_brush(brush)
        .with_brush2(brush2)
        .with_segments(pollen.segments)
        .with_render_type(RenderType::BrushImageLerp)
        .with_random_id(next_random_id(ctx.rng))
        .with_radius_map(move |age| lens(easing.apply(age)))
        .build();
    Some(particle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::registry::BrushRegistry;
    use crate::components::particle::TickContext;
    use crate::math::{Perlin, Rng};
    use crate::systems::growth::testing::full_registry;
    use glam::DVec3;

    fn tip() -> Anchor {
        Anchor {
            position: DVec3::new(1.0, 2.0, 3.0),
            origin: DVec3::ZERO,
            direction: DVec3::new(0.0, 0.0, -4.0),
            random_id: 9.0,
            lifespan: -1,
            original_lifespan: 20,
            radius: 3.0,
        }
    }

    #[test]
    fn pollen_is_short_lived_and_terminal() {
        let noise = Perlin::new(1);
        let mut rng = Rng::new(6);
        let mut brushes = full_registry();
        let mut ctx = GrowthContext { frame: 0, noise: &noise, rng: &mut rng, brushes: &mut brushes };
        let profile = SpeciesProfile::lycoris();

        let mut mote = generate_flower_end(&tip(), &profile, &mut ctx).unwrap();
        assert_eq!(mote.position, tip().position);
        assert!(mote.radius >= 4.0 && mote.radius < 8.0);
        assert!(mote.lifespan >= 10 && mote.lifespan <= 20);
        assert!(mote.velocity.length() >= 0.8 - 1e-9 && mote.velocity.length() <= 1.0);

        let mut spawned = Vec::new();
        for frame in 0..100 {
            spawned.extend(mote.update(&TickContext { frame, noise: &noise }));
        }
        assert!(!mote.is_alive());
        assert!(spawned.is_empty(), "pollen ends the chain");
    }

    #[test]
    fn species_without_pollen_yields_nothing() {
        let noise = Perlin::new(1);
        let mut rng = Rng::new(6);
        let mut brushes = full_registry();
        let mut ctx = GrowthContext { frame: 0, noise: &noise, rng: &mut rng, brushes: &mut brushes };
        assert!(generate_flower_end(&tip(), &SpeciesProfile::lavender(), &mut ctx).is_none());
    }

    #[test]
    fn missing_pollen_brush_skips() {
        let noise = Perlin::new(1);
        let mut rng = Rng::new(6);
        let mut brushes = BrushRegistry::new();
        let mut ctx = GrowthContext { frame: 0, noise: &noise, rng: &mut rng, brushes: &mut brushes };
        assert!(generate_flower_end(&tip(), &SpeciesProfile::lycoris(), &mut ctx).is_none());
    }
}
