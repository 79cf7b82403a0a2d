use crate::components::particle::{Particle, TickContext};
use crate::renderer::painter::Painter;
use crate::renderer::view::DrawContext;
use crate::systems::growth::{fulfil, GrowthContext, SpawnRequest};

/// Simple particle storage using a flat Vec.
/// Order is draw order; it is re-derived by depth after every draw.
pub struct ParticleScene {
    particles: Vec<Particle>,
    /// Requests raised during the current update, fulfilled at its end.
    pending: Vec<SpawnRequest>,
}

impl ParticleScene {
    pub fn new() -> Self {
        Self {
            particles: Vec::with_capacity(1024),
            pending: Vec::new(),
        }
    }

    /// Create a scene with a specific particle capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            pending: Vec::new(),
        }
    }

    /// Add a particle. It is first updated on the next `update`.
    pub fn add_particle(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn extend(&mut self, particles: impl IntoIterator<Item = Particle>) {
        self.particles.extend(particles);
    }

    /// Advance every particle one tick.
    ///
    /// Particles that died on the previous frame are dropped first. Only the
    /// particles present when the call starts are updated; the children their
    /// deaths request are appended afterwards and first move next frame.
    pub fn update(&mut self, ctx: &mut GrowthContext) {
        self.particles.retain(Particle::is_alive);

        let tick = TickContext {
            frame: ctx.frame,
            noise: ctx.noise,
        };
        for particle in self.particles.iter_mut() {
            self.pending.extend(particle.update(&tick));
        }

        for request in std::mem::take(&mut self.pending) {
            let spawned = fulfil(&request, ctx);
            self.particles.extend(spawned);
        }
    }

    /// Draw in current order, then sort farthest-first for the next frame.
    pub fn draw(&mut self, ctx: &DrawContext, painter: &mut dyn Painter) {
        for particle in &self.particles {
            particle.draw(ctx, painter);
        }
        let view = ctx.view;
        self.particles.sort_by(|a, b| {
            view.depth_sq(b.position)
                .total_cmp(&view.depth_sq(a.position))
        });
    }

    /// Discard every particle and pending request.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.pending.clear();
    }

    /// Number of particles, alive or awaiting removal.
    pub fn count(&self) -> usize {
        self.particles.len()
    }

    /// Number of particles still alive.
    pub fn alive_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_alive()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Iterate over all particles.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}

impl Default for ParticleScene {
    fn default() -> Self {
        Self::new()
    }
}
