use std::rc::Rc;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::components::particle::Particle;
use crate::math::Rng;
use crate::systems::growth::profile::Span;
use crate::systems::growth::{generate_stem, GrowthContext, SpeciesProfile};

/// Golden angle in radians.
const GOLDEN_ANGLE: f64 = 2.399;

/// How stems are arranged over the planting box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantingLayout {
    /// Independent uniform positions.
    #[default]
    Scatter,
    /// Groups of 3-7 stems around random centres, one group per five stems.
    Cluster,
    /// Phyllotaxis spiral around the box centre, outer stems set lower.
    Spiral,
    /// Rows on a `ceil(sqrt(count))` square grid, each cell jittered by
    /// up to a fifth of the cell step.
    Grid,
}

/// Where and how many stems to plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantingRequest {
    pub count: u32,
    pub layout: PlantingLayout,
    pub x: Span,
    pub y: Span,
    pub z: Span,
    /// Added to every sampled `y`; the ground line.
    pub ground: f64,
}

impl Default for PlantingRequest {
    fn default() -> Self {
        Self {
            count: 10,
            layout: PlantingLayout::Scatter,
            x: (-100.0, 100.0),
            y: (-20.0, 20.0),
            z: (-100.0, 100.0),
            ground: 300.0,
        }
    }
}

impl PlantingRequest {
    pub fn new(count: u32) -> Self {
        Self {
            count,
            ..Default::default()
        }
    }

    pub fn with_layout(mut self, layout: PlantingLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_bounds(mut self, x: Span, y: Span, z: Span) -> Self {
        self.x = x;
        self.y = y;
        self.z = z;
        self
    }

    fn random_point(&self, rng: &mut Rng) -> DVec3 {
        DVec3::new(
            rng.range(self.x.0, self.x.1),
            rng.range(self.y.0, self.y.1) + self.ground,
            rng.range(self.z.0, self.z.1),
        )
    }

    /// Stem root positions for this request.
    pub fn positions(&self, rng: &mut Rng) -> Vec<DVec3> {
        match self.layout {
            PlantingLayout::Scatter => (0..self.count).map(|_| self.random_point(rng)).collect(),
            PlantingLayout::Cluster => {
                let clusters = self.count.div_ceil(5);
                let mut out = Vec::new();
                for _ in 0..clusters {
                    let center = self.random_point(rng);
                    let members = rng.range_int(3, 8);
                    for _ in 0..members {
                        let offset = DVec3::new(
                            rng.signed(25.0),
                            rng.signed(5.0),
                            rng.signed(25.0),
                        );
                        out.push(center + offset);
                    }
                }
                out
            }
            PlantingLayout::Spiral => {
                let cx = (self.x.0 + self.x.1) * 0.5;
                let cz = (self.z.0 + self.z.1) * 0.5;
                (0..self.count)
                    .map(|i| {
                        let angle = i as f64 * GOLDEN_ANGLE;
                        let radius = (i as f64).sqrt() * 25.0;
                        let depth = ((angle * 0.5).sin() + 1.0) * 0.5;
                        DVec3::new(
                            cx + angle.cos() * radius,
                            rng.range(self.y.0, self.y.1) + self.ground - depth * 60.0,
                            cz + angle.sin() * radius,
                        )
                    })
                    .collect()
            }
            PlantingLayout::Grid => {
                let size = (self.count as f64).sqrt().ceil() as u32;
                let (x_start, x_step) = grid_axis(self.x, size);
                let (z_start, z_step) = grid_axis(self.z, size);
                let mut out = Vec::with_capacity(self.count as usize);
                for i in 0..size {
                    for j in 0..size {
                        if i * size + j >= self.count {
                            break;
                        }
                        out.push(DVec3::new(
                            x_start + i as f64 * x_step + rng.signed(x_step * 0.2),
                            rng.range(self.y.0, self.y.1) + self.ground,
                            z_start + j as f64 * z_step + rng.signed(z_step * 0.2),
                        ));
                    }
                }
                out
            }
        }
    }
}

/// First cell and step along one axis. A single cell sits at the centre.
fn grid_axis(span: Span, size: u32) -> (f64, f64) {
    if size <= 1 {
        return ((span.0 + span.1) * 0.5, 0.0);
    }
    (span.0, (span.1 - span.0) / (size - 1) as f64)
}

/// Seed a bed of stems. Stems whose brushes are unavailable are skipped.
pub fn plant_field(
    request: &PlantingRequest,
    profile: &Rc<SpeciesProfile>,
    ctx: &mut GrowthContext,
) -> Vec<Particle> {
    let positions = request.positions(ctx.rng);
    let stems: Vec<Particle> = positions
        .into_iter()
        .filter_map(|at| generate_stem(at, profile, ctx))
        .collect();
    log::info!(
        "planted {} {} stems ({:?})",
        stems.len(),
        profile.name,
        request.layout
    );
    stems
}
