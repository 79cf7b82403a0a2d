use std::f64::consts::TAU;
use std::rc::Rc;

use glam::DVec3;

use super::profile::{sample, sample_count, SpeciesProfile};
use super::{next_random_id, pick_brush_pair, Generation, GrowthContext, SpawnRequest};
use crate::components::particle::{Anchor, Particle, ParticleConfig};
use crate::extensions::easing::{lens, remap};
use crate::math::{
    perpendicular_basis, rotate_around_axis, rotate_in_plane, rotate_random_cone, rotate_x,
    rotate_y, rotate_z, Perlin, Rng,
};
use crate::renderer::strategy::RenderType;

/// Shared geometry of one flower, computed once when its stem dies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowerParams {
    /// Growth axis of the stem at its tip, unit length.
    pub axis: DVec3,
    pub scale: f64,
    /// Direction petals bend toward as they age.
    pub center: DVec3,
    /// Unit vector perpendicular to `axis`.
    pub basis: DVec3,
    /// `basis` leaned toward (or away from) `axis`.
    pub tilted: DVec3,
    pub petal_count: u32,
    pub radius: f64,
    pub start_angle: f64,
    pub rotate_factor: f64,
}

impl FlowerParams {
    pub fn compute(anchor: &Anchor, profile: &SpeciesProfile, rng: &mut Rng) -> Self {
        let flower = &profile.flower;
        let axis = anchor.direction.try_normalize().unwrap_or(DVec3::NEG_Y);
        let scale = sample(rng, flower.scale);
        let lean = rng.range(0.0, flower.center_tilt) * rng.range(0.5, 1.0);
        let center = rotate_random_cone(axis, lean, rng);
        let basis = perpendicular_basis(axis);
        let tilted = basis
            .lerp(axis, sample(rng, flower.petal_tilt))
            .try_normalize()
            .unwrap_or(basis);
        Self {
            axis,
            scale,
            center,
            basis,
            tilted,
            petal_count: sample_count(rng, flower.petal_count),
            radius: sample(rng, flower.radius),
            start_angle: rng.range(0.0, flower.start_angle),
            rotate_factor: sample(rng, flower.rotate_factor),
        }
    }

    /// Direction of ring slot `i` of `count` around the stem axis.
    pub fn ring_direction(&self, from: DVec3, i: u32, count: u32) -> DVec3 {
        let angle = self.start_angle + i as f64 / count.max(1) as f64 * TAU;
        rotate_around_axis(from, self.axis, angle)
    }
}

/// Bend amplitude: gentle on a fresh petal, growing as its life runs out.
#[inline]
fn bend_amplitude(age: f64, strength: f64, rotate_factor: f64) -> f64 {
    let falloff = remap(age, 1.0, 0.0, 3.0, 0.3);
    1.0 / (falloff * falloff) * strength * rotate_factor
}

/// Small periodic sway on every axis.
fn wobble(v: DVec3, frame: u64, id: f64, amplitude: f64, noise: &Perlin) -> DVec3 {
    let f = frame as f64;
    let v = rotate_y(v, (f / 4.0 + id + noise.sample2(f / 3.0, id)).sin() * amplitude);
    let v = rotate_z(v, (f / 6.0 + id + noise.sample(f / 3.0, id, 50.0)).cos() * amplitude);
    let v = rotate_x(v, (f / 7.0 + id + noise.sample(f / 3.0, id, 500.0)).sin() * amplitude);
    rotate_z(v, (f / 50.0 + id + noise.sample2(f / 50.0, id)).sin() * amplitude)
}

/// Spawn the petals (and stamens, when the species has them) of one flower.
///
/// Slots whose brushes are unavailable are skipped; the rest still bloom.
pub fn generate_flower(
    anchor: &Anchor,
    profile: &Rc<SpeciesProfile>,
    pre_delay: i32,
    ctx: &mut GrowthContext,
) -> Vec<Particle> {
    let params = FlowerParams::compute(anchor, profile, ctx.rng);
    let mut out = generate_petals(anchor, profile, &params, pre_delay, ctx);
    out.extend(generate_stamens(anchor, profile, &params, pre_delay, ctx));
    log::debug!(
        "{} bloom: {} particles at ({:.1}, {:.1}, {:.1})",
        profile.name,
        out.len(),
        anchor.position.x,
        anchor.position.y,
        anchor.position.z
    );
    out
}

fn generate_petals(
    anchor: &Anchor,
    profile: &SpeciesProfile,
    params: &FlowerParams,
    pre_delay: i32,
    ctx: &mut GrowthContext,
) -> Vec<Particle> {
    let petals = &profile.petals;
    let radius = params.radius * params.scale;
    // Shared by every petal of this flower so they open together.
    let shape_offset = ctx.noise.sample2(anchor.random_id, anchor.lifespan as f64 / 10.0) / 10.0;

    let mut out = Vec::with_capacity(params.petal_count as usize);
    for i in 0..params.petal_count {
        let ring = params.ring_direction(params.tilted, i, params.petal_count);
        let scatter = ctx.rng.range(0.0, petals.scatter);
        let direction = rotate_random_cone(ring, scatter, ctx.rng);

        let Some((brush, brush2)) = pick_brush_pair(&petals.palettes, "petal", ctx) else {
            continue;
        };

        let (easing, passes, shape_scale) = (petals.easing, petals.easing_passes, petals.shape_scale);
        let (center, strength, rotate_factor, wobble_amp) =
            (params.center, petals.bend, params.rotate_factor, petals.wobble);

        let petal = ParticleConfig::new()
            .with_position(anchor.position)
            .with_velocity(direction.normalize_or_zero() * petals.speed)
            .with_radius(radius)
            .with_lifespan((radius * petals.lifespan_factor).round() as i32)
            .with_radius_shrink(petals.radius_shrink)
            .with_velocity_shrink(petals.velocity_shrink)
            .with_pre_delay(pre_delay)
            .with_color(petals.color)
            .with_brush(brush)
            .with_brush2(brush2)
            .with_segments(petals.segments)
            .with_render_type(RenderType::BrushImageLerp)
            .with_random_id(next_random_id(ctx.rng))
            .with_radius_map(move |age| {
                lens(easing.apply_n(age, passes) + shape_offset) * shape_scale
            })
            .with_tick(move |p, tick| {
                let amp = bend_amplitude(p.normalized_age(), strength, rotate_factor);
                let bent = rotate_in_plane(center, direction, p.velocity, amp);
                p.velocity = if wobble_amp > 0.0 {
                    wobble(bent, tick.frame, p.random_id, wobble_amp, tick.noise)
                } else {
                    bent
                };
            })
            .build();
        out.push(petal);
    }
    out
}

fn generate_stamens(
    anchor: &Anchor,
    profile: &Rc<SpeciesProfile>,
    params: &FlowerParams,
    pre_delay: i32,
    ctx: &mut GrowthContext,
) -> Vec<Particle> {
    let Some(stamens) = &profile.stamens else {
        return Vec::new();
    };
    let count = sample_count(ctx.rng, stamens.count);
    let radius = sample(ctx.rng, stamens.radius) * params.scale;
    let has_pollen = profile.pollen.is_some();

    let mut out = Vec::with_capacity(count as usize);
    for i in 0..count {
        let tilted = params
            .basis
            .lerp(params.axis, sample(ctx.rng, stamens.tilt))
            .try_normalize()
            .unwrap_or(params.basis);
        let direction = params.ring_direction(tilted, i, count);
        let speed = sample(ctx.rng, stamens.speed);

        let Some((brush, brush2)) = pick_brush_pair(&stamens.palettes, "stamen", ctx) else {
            continue;
        };

        let (center, strength, rotate_factor) = (params.center, stamens.bend, params.rotate_factor);
        let mut config = ParticleConfig::new()
            .with_position(anchor.position)
            .with_velocity(direction.normalize_or_zero() * speed)
            .with_radius(radius)
            .with_lifespan((radius * stamens.lifespan_factor).round() as i32)
            .with_radius_shrink(stamens.radius_shrink)
            .with_velocity_shrink(stamens.velocity_shrink)
            .with_pre_delay(pre_delay)
            .with_color(stamens.color)
            .with_brush(brush)
            .with_brush2(brush2)
            .with_segments(stamens.segments)
            .with_render_type(RenderType::BrushImageLerp)
            .with_random_id(next_random_id(ctx.rng))
            .with_tick(move |p, _| {
                let amp = bend_amplitude(p.normalized_age(), strength, rotate_factor);
                p.velocity = rotate_in_plane(center, direction, p.velocity, amp);
            });
        if has_pollen {
            let profile = profile.clone();
            config = config.on_end(move |tip| {
                vec![SpawnRequest {
                    generation: Generation::Pollen,
                    anchor: *tip,
                    pre_delay: 0,
                    profile,
                }]
            });
        }
        out.push(config.build());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BrushHandle;
    use crate::assets::registry::BrushRegistry;
    use crate::components::particle::TickContext;
    use crate::systems::growth::testing::full_registry;

    fn stem_anchor() -> Anchor {
        Anchor {
            position: DVec3::new(5.0, 120.0, -3.0),
            origin: DVec3::new(5.0, 300.0, -3.0),
            direction: DVec3::new(0.2, -1.8, 0.3),
            random_id: 321.0,
            lifespan: -1,
            original_lifespan: 100,
            radius: 14.0,
        }
    }

    /// Lycoris with a fixed 20-petal ring, no scatter, no stamens.
    fn ring_profile() -> SpeciesProfile {
        let mut profile = SpeciesProfile::lycoris();
        profile.flower.petal_count = (20.0, 20.5);
        profile.petals.scatter = 0.0;
        profile.stamens = None;
        profile
    }

    #[test]
    fn params_basis_is_perpendicular_to_axis() {
        let mut rng = Rng::new(4);
        let profile = SpeciesProfile::lycoris();
        for _ in 0..20 {
            let p = FlowerParams::compute(&stem_anchor(), &profile, &mut rng);
            assert!(p.basis.dot(p.axis).abs() < 1e-9);
            assert!((p.tilted.length() - 1.0).abs() < 1e-9);
            assert!((20..40).contains(&p.petal_count));
            assert!(p.start_angle >= 0.0 && p.start_angle < std::f64::consts::PI);
        }
    }

    #[test]
    fn twenty_petals_fan_out_evenly() {
        let noise = Perlin::new(1);
        let mut rng = Rng::new(12);
        let mut brushes = full_registry();
        let mut ctx = GrowthContext { frame: 0, noise: &noise, rng: &mut rng, brushes: &mut brushes };
        let profile = Rc::new(ring_profile());
        let anchor = stem_anchor();

        let petals = generate_flower(&anchor, &profile, 0, &mut ctx);
        assert_eq!(petals.len(), 20);

        // Project each petal direction onto the plane normal to the stem axis.
        let axis = anchor.direction.normalize();
        let basis = perpendicular_basis(axis);
        let other = axis.cross(basis);
        let mut angles: Vec<f64> = petals
            .iter()
            .map(|p| {
                let v = p.velocity - axis * p.velocity.dot(axis);
                v.dot(other).atan2(v.dot(basis)).rem_euclid(TAU)
            })
            .collect();
        angles.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let step = TAU / 20.0;
        for w in angles.windows(2) {
            assert!((w[1] - w[0] - step).abs() < 1e-6, "gap {}", w[1] - w[0]);
        }
        let wrap = angles[0] + TAU - angles[19];
        assert!((wrap - step).abs() < 1e-6);
    }

    #[test]
    fn petals_start_at_anchor_with_delay() {
        let noise = Perlin::new(1);
        let mut rng = Rng::new(12);
        let mut brushes = full_registry();
        let mut ctx = GrowthContext { frame: 0, noise: &noise, rng: &mut rng, brushes: &mut brushes };
        let profile = Rc::new(SpeciesProfile::lavender());
        let anchor = stem_anchor();
        let petals = generate_flower(&anchor, &profile, 7, &mut ctx);
        assert!((6..12).contains(&petals.len()));
        for p in &petals {
            assert_eq!(p.position, anchor.position);
            assert_eq!(p.pre_delay, 7);
            assert!((p.velocity.length() - 0.8).abs() < 1e-9);
        }
    }

    #[test]
    fn missing_brushes_skip_only_those_slots() {
        let noise = Perlin::new(1);
        let mut rng = Rng::new(12);
        // only the "red" palette exists; red_black and red_white are missing
        let mut brushes = BrushRegistry::new();
        brushes.insert("red", vec![BrushHandle(1)]);
        let mut ctx = GrowthContext { frame: 0, noise: &noise, rng: &mut rng, brushes: &mut brushes };
        let profile = Rc::new(ring_profile());
        let petals = generate_flower(&stem_anchor(), &profile, 0, &mut ctx);
        assert!(!petals.is_empty(), "some petals should still bloom");
        assert!(petals.len() < 20, "petals without brushes are skipped");
        assert!(petals.iter().all(|p| p.brush == Some(BrushHandle(1))));
    }

    #[test]
    fn no_brushes_at_all_yields_empty_flower() {
        let noise = Perlin::new(1);
        let mut rng = Rng::new(12);
        let mut brushes = BrushRegistry::new();
        let mut ctx = GrowthContext { frame: 0, noise: &noise, rng: &mut rng, brushes: &mut brushes };
        let profile = Rc::new(SpeciesProfile::lycoris());
        assert!(generate_flower(&stem_anchor(), &profile, 0, &mut ctx).is_empty());
    }

    #[test]
    fn stamens_retract_and_request_pollen() {
        let noise = Perlin::new(1);
        let mut rng = Rng::new(5);
        let mut brushes = full_registry();
        let mut ctx = GrowthContext { frame: 0, noise: &noise, rng: &mut rng, brushes: &mut brushes };
        let mut profile = SpeciesProfile::lycoris();
        profile.flower.petal_count = (0.0, 0.5);
        let profile = Rc::new(profile);
        let anchor = stem_anchor();

        let mut stamens = generate_flower(&anchor, &profile, 0, &mut ctx);
        assert!((35..40).contains(&stamens.len()));

        let axis = anchor.direction.normalize();
        for s in &stamens {
            // negative speed on a basis tilted away from the axis points back along it
            assert!(s.velocity.dot(axis) > -1e-9);
            assert!(s.velocity.length() >= 2.0 && s.velocity.length() <= 3.0);
        }

        let mut requests = Vec::new();
        for frame in 0..200 {
            for s in stamens.iter_mut() {
                requests.extend(s.update(&TickContext { frame, noise: &noise }));
            }
        }
        assert_eq!(requests.len(), stamens.len());
        assert!(requests.iter().all(|r| r.generation == Generation::Pollen));
    }

    #[test]
    fn bend_amplitude_grows_as_life_runs_out() {
        let young = bend_amplitude(1.0, 0.1, 1.0);
        let old = bend_amplitude(0.05, 0.1, 1.0);
        assert!(young < old, "falloff divisor shrinks as age drops");
        assert!((young - 0.1 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn petal_shape_is_positive_midlife() {
        let noise = Perlin::new(1);
        let mut rng = Rng::new(12);
        let mut brushes = full_registry();
        let mut ctx = GrowthContext { frame: 0, noise: &noise, rng: &mut rng, brushes: &mut brushes };
        let profile = Rc::new(ring_profile());
        let mut petals = generate_flower(&stem_anchor(), &profile, 0, &mut ctx);
        let petal = &mut petals[0];
        let full = petal.original_lifespan();
        petal.lifespan = full / 2;
        let r = petal.calculate_radius();
        assert!(r > crate::components::particle::MIN_DRAW_RADIUS);
        assert!(r <= petal.radius * 1.4 + 1e-9);
    }
}
