use std::rc::Rc;

use glam::DVec3;

use super::profile::{sample, sample_count, SpeciesProfile, SpikeProfile};
use super::{next_random_id, pick_brush_pair, Generation, GrowthContext, SpawnRequest};
use crate::components::particle::{Anchor, Particle, ParticleConfig};
use crate::math::rotate_random_cone;
use crate::renderer::strategy::RenderType;

/// Grow one stem from `position`. Returns None when the stem palette has no
/// brushes yet.
pub fn generate_stem(
    position: DVec3,
    profile: &Rc<SpeciesProfile>,
    ctx: &mut GrowthContext,
) -> Option<Particle> {
    let stem = &profile.stem;
    let (brush, brush2) = pick_brush_pair(std::slice::from_ref(&stem.palette), "stem", ctx)?;

    let up = DVec3::new(0.0, -sample(ctx.rng, stem.lift) - 1.0, 0.0);
    let lean = ctx.rng.range(0.0, stem.max_tilt);
    let direction = rotate_random_cone(up, lean, ctx.rng);

    let wind = stem.wind.clone();
    let on_end_profile = profile.clone();
    let spike_count = profile
        .spikes
        .as_ref()
        .map(|spikes| sample_count(ctx.rng, spikes.count).max(1));

    let particle = ParticleConfig::new()
        .with_position(position)
        .with_velocity(direction)
        .with_acceleration(DVec3::new(0.0, -stem.gravity, 0.0))
        .with_radius(sample(ctx.rng, stem.radius))
        .with_lifespan(sample(ctx.rng, stem.lifespan).round() as i32)
        .with_velocity_shrink(stem.velocity_shrink)
        .with_radius_shrink(stem.radius_shrink)
        .with_speed_limit(stem.speed_limit)
        .with_jitter(stem.jitter, 100.0)
        .with_segments(stem.segments)
        .with_color(stem.color)
        .with_brush(brush)
        .with_brush2(brush2)
        .with_render_type(RenderType::BrushImageLerp)
        .with_random_id(next_random_id(ctx.rng))
        .with_tick(move |p, tick| {
            let t = tick.frame as f64 / wind.period;
            let id = p.random_id;
            p.position.x += tick.noise.signed(id, t, 0.0) * wind.amplitude[0];
            p.position.y += tick.noise.signed(t, id, wind.offset) * wind.amplitude[1];
            p.position.z += tick.noise.signed(wind.offset, id, t) * wind.amplitude[2];
        })
        .on_end(move |anchor| stem_end(anchor, &on_end_profile, spike_count))
        .build();
    Some(particle)
}

/// Requests for the flower head(s) a finished stem carries.
fn stem_end(anchor: &Anchor, profile: &Rc<SpeciesProfile>, spike_count: Option<u32>) -> Vec<SpawnRequest> {
    match (&profile.spikes, spike_count) {
        (Some(spikes), Some(count)) => spike_anchors(anchor, spikes, count)
            .into_iter()
            .map(|(anchor, pre_delay)| SpawnRequest {
                generation: Generation::Flower,
                anchor,
                pre_delay,
                profile: profile.clone(),
            })
            .collect(),
        _ => vec![SpawnRequest {
            generation: Generation::Flower,
            anchor: *anchor,
            pre_delay: 0,
            profile: profile.clone(),
        }],
    }
}

/// Flower anchors spread over the last part of the stem path, lowest first.
///
/// Head `i` sits at path fraction `start + i / (count - 1) * span`, offset
/// backward from the tip along the stem direction, and opens
/// `i * stagger_ticks` after the lowest one.
pub fn spike_anchors(anchor: &Anchor, spikes: &SpikeProfile, count: u32) -> Vec<(Anchor, i32)> {
    let path = anchor.position.distance(anchor.origin);
    let along = anchor.direction.normalize_or_zero();
    let steps = count.saturating_sub(1).max(1) as f64;
    (0..count)
        .map(|i| {
            let progress = spikes.start + i as f64 / steps * spikes.span;
            let back = path * (1.0 - progress).max(0.0);
            let spike = Anchor {
                position: anchor.position - along * back,
                ..*anchor
            };
            (spike, i as i32 * spikes.stagger_ticks)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::registry::BrushRegistry;
    use crate::components::particle::TickContext;
    use crate::math::{Perlin, Rng};
    use crate::systems::growth::testing::full_registry;

    #[test]
    fn stem_grows_upward() {
        let noise = Perlin::new(1);
        let mut rng = Rng::new(8);
        let mut brushes = full_registry();
        let mut ctx = GrowthContext { frame: 0, noise: &noise, rng: &mut rng, brushes: &mut brushes };
        let profile = Rc::new(SpeciesProfile::lavender());
        for _ in 0..20 {
            let stem = generate_stem(DVec3::new(0.0, 300.0, 0.0), &profile, &mut ctx).unwrap();
            // 35° max lean keeps the stem pointing up (negative y)
            assert!(stem.velocity.y < 0.0);
            assert!((60..=200).contains(&stem.lifespan));
            assert_eq!(stem.render_type, RenderType::BrushImageLerp);
        }
    }

    #[test]
    fn missing_stem_brush_skips_plant() {
        let noise = Perlin::new(1);
        let mut rng = Rng::new(8);
        let mut brushes = BrushRegistry::new();
        let mut ctx = GrowthContext { frame: 0, noise: &noise, rng: &mut rng, brushes: &mut brushes };
        let profile = Rc::new(SpeciesProfile::lycoris());
        assert!(generate_stem(DVec3::ZERO, &profile, &mut ctx).is_none());
    }

    #[test]
    fn single_flower_stem_requests_one_head() {
        let noise = Perlin::new(1);
        let mut rng = Rng::new(3);
        let mut brushes = full_registry();
        let mut ctx = GrowthContext { frame: 0, noise: &noise, rng: &mut rng, brushes: &mut brushes };
        let profile = Rc::new(SpeciesProfile::lycoris());
        let mut stem = generate_stem(DVec3::new(0.0, 300.0, 0.0), &profile, &mut ctx).unwrap();
        stem.lifespan = 5;

        let mut requests = Vec::new();
        for frame in 0..20 {
            requests.extend(stem.update(&TickContext { frame, noise: &noise }));
        }
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].generation, Generation::Flower);
        // the wind tick moves the stem after death; the anchor is the death sample
        let last = stem.history().last().unwrap();
        assert_eq!(requests[0].anchor.position, last.position);
    }

    #[test]
    fn spikes_sit_in_last_third_and_open_lowest_first() {
        let anchor = Anchor {
            position: DVec3::new(0.0, 0.0, 0.0),
            origin: DVec3::new(0.0, 100.0, 0.0),
            direction: DVec3::new(0.0, -2.0, 0.0),
            random_id: 1.0,
            lifespan: -1,
            original_lifespan: 100,
            radius: 5.0,
        };
        let spikes = SpeciesProfile::lavender().spikes.unwrap();
        let heads = spike_anchors(&anchor, &spikes, 4);
        assert_eq!(heads.len(), 4);

        // lowest head 30% of the path below the tip, top head at the tip
        assert!((heads[0].0.position.y - 30.0).abs() < 1e-9);
        assert!(heads[3].0.position.y.abs() < 1e-9);
        for w in heads.windows(2) {
            assert!(w[0].0.position.y > w[1].0.position.y, "heads ascend");
            assert!(w[0].1 < w[1].1, "lower heads open first");
        }
        assert_eq!(heads[0].1, 0);
        assert_eq!(heads[3].1, 3 * spikes.stagger_ticks);
    }

    #[test]
    fn single_spike_sits_at_start_fraction() {
        let anchor = Anchor {
            position: DVec3::ZERO,
            origin: DVec3::new(0.0, 50.0, 0.0),
            direction: DVec3::NEG_Y,
            random_id: 0.0,
            lifespan: -1,
            original_lifespan: 10,
            radius: 1.0,
        };
        let spikes = SpeciesProfile::lavender().spikes.unwrap();
        let heads = spike_anchors(&anchor, &spikes, 1);
        assert_eq!(heads.len(), 1);
        assert!((heads[0].0.position.y - 15.0).abs() < 1e-9);
    }

    #[test]
    fn lavender_stem_end_emits_staggered_requests() {
        let profile = Rc::new(SpeciesProfile::lavender());
        let anchor = Anchor {
            position: DVec3::ZERO,
            origin: DVec3::new(0.0, 120.0, 0.0),
            direction: DVec3::NEG_Y,
            random_id: 17.5,
            lifespan: -1,
            original_lifespan: 120,
            radius: 12.0,
        };
        let requests = stem_end(&anchor, &profile, Some(6));
        assert_eq!(requests.len(), 6);
        let delays: Vec<i32> = requests.iter().map(|r| r.pre_delay).collect();
        let mut sorted = delays.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), delays.len(), "every head has its own delay");
    }
}
