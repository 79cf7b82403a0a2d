use std::rc::Rc;

use glam::DVec3;

use crate::api::sketch::GardenConfig;
use crate::assets::registry::{BrushProvider, BrushRegistry};
use crate::components::particle::Particle;
use crate::core::scene::ParticleScene;
use crate::core::time::FrameClock;
use crate::math::{Perlin, Rng};
use crate::renderer::painter::Painter;
use crate::renderer::view::{DrawContext, ViewParams};
use crate::systems::field::{plant_field, PlantingRequest};
use crate::systems::growth::{generate_stem, GrowthContext, SpeciesProfile};

/// The running world: particles plus every collaborator growth needs.
///
/// One `step` is one simulation frame; `render` paints the current state.
pub struct Garden {
    scene: ParticleScene,
    rng: Rng,
    noise: Perlin,
    brushes: Box<dyn BrushProvider>,
    clock: FrameClock,
    pub view: ViewParams,
}

impl Garden {
    pub fn new(config: &GardenConfig) -> Self {
        Self {
            scene: ParticleScene::with_capacity(config.max_particles),
            rng: Rng::new(config.seed),
            noise: Perlin::new(config.seed),
            brushes: Box::new(BrushRegistry::new()),
            clock: FrameClock::new(config.fixed_dt),
            view: config.view,
        }
    }

    /// Replace the brush source, e.g. once the host has rasterized its heads.
    pub fn set_brushes(&mut self, brushes: Box<dyn BrushProvider>) {
        self.brushes = brushes;
    }

    /// Seed a field of stems. Returns the number planted.
    pub fn plant(&mut self, request: &PlantingRequest, profile: &Rc<SpeciesProfile>) -> usize {
        let frame = self.clock.frame();
        let mut ctx = GrowthContext {
            frame,
            noise: &self.noise,
            rng: &mut self.rng,
            brushes: &mut *self.brushes,
        };
        let stems = plant_field(request, profile, &mut ctx);
        let planted = stems.len();
        self.scene.extend(stems);
        planted
    }

    /// Plant a single stem at `position`. False if its brushes are missing.
    pub fn plant_stem(&mut self, position: DVec3, profile: &Rc<SpeciesProfile>) -> bool {
        let frame = self.clock.frame();
        let mut ctx = GrowthContext {
            frame,
            noise: &self.noise,
            rng: &mut self.rng,
            brushes: &mut *self.brushes,
        };
        match generate_stem(position, profile, &mut ctx) {
            Some(stem) => {
                self.scene.add_particle(stem);
                true
            }
            None => false,
        }
    }

    /// Add a hand-built particle.
    pub fn add_particle(&mut self, particle: Particle) {
        self.scene.add_particle(particle);
    }

    /// Feed host frame time into the clock. Returns how many `step`s to run.
    pub fn accumulate(&mut self, dt: f32) -> u32 {
        self.clock.accumulate(dt)
    }

    /// Advance one simulation frame.
    pub fn step(&mut self) {
        let frame = self.clock.advance();
        let mut ctx = GrowthContext {
            frame,
            noise: &self.noise,
            rng: &mut self.rng,
            brushes: &mut *self.brushes,
        };
        self.scene.update(&mut ctx);
    }

    /// Paint every particle for the current frame.
    pub fn render(&mut self, painter: &mut dyn Painter) {
        let ctx = DrawContext {
            view: &self.view,
            frame: self.clock.frame(),
            noise: &self.noise,
        };
        self.scene.draw(&ctx, painter);
    }

    /// Remove all particles and restart the frame count.
    pub fn clear(&mut self) {
        self.scene.clear();
        self.clock.reset();
        log::info!("garden cleared");
    }

    pub fn frame(&self) -> u64 {
        self.clock.frame()
    }

    pub fn particle_count(&self) -> usize {
        self.scene.count()
    }

    pub fn scene(&self) -> &ParticleScene {
        &self.scene
    }

    pub fn rng(&mut self) -> &mut Rng {
        &mut self.rng
    }
}
