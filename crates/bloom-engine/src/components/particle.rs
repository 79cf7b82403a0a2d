use glam::{DVec2, DVec3};

use crate::api::types::{BrushHandle, Rgba};
use crate::math::Perlin;
use crate::renderer::painter::Painter;
use crate::renderer::strategy::{RenderType, StrokeFrame};
use crate::renderer::view::DrawContext;
use crate::systems::growth::SpawnRequest;

/// Smallest size handed to a render strategy.
pub const MIN_DRAW_RADIUS: f64 = 0.001;
/// Radius below which a particle dies.
pub const DEATH_RADIUS: f64 = 0.1;

/// Per-frame custom motion, run after the lifecycle step.
pub type TickHook = Box<dyn FnMut(&mut Particle, &TickContext)>;
/// Fired once at death; returns the next generation to spawn.
pub type EndHook = Box<dyn FnOnce(&Anchor) -> Vec<SpawnRequest>>;
/// Shape curve over normalized age (radius map, brush blend).
pub type ShapeFn = Box<dyn Fn(f64) -> f64>;

/// Shared inputs for one update step.
pub struct TickContext<'a> {
    pub frame: u64,
    pub noise: &'a Perlin,
}

/// Snapshot of a particle at the moment it died.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub position: DVec3,
    pub origin: DVec3,
    /// Velocity at death, the direction the structure was growing.
    pub direction: DVec3,
    pub random_id: f64,
    pub lifespan: i32,
    pub original_lifespan: i32,
    pub radius: f64,
}

/// A recorded trail sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    /// Active-update count when the sample was taken.
    pub tick: u32,
    pub position: DVec3,
}

/// Construction parameters for a `Particle`.
pub struct ParticleConfig {
    pub position: DVec3,
    pub velocity: DVec3,
    pub acceleration: DVec3,
    pub radius: f64,
    pub lifespan: i32,
    pub speed_limit: f64,
    pub velocity_shrink: f64,
    pub radius_shrink: f64,
    pub pre_delay: i32,
    pub random_id: f64,
    pub render_type: RenderType,
    pub brush: Option<BrushHandle>,
    pub brush2: Option<BrushHandle>,
    pub color: Rgba,
    /// Screen-space jitter amplitude.
    pub jitter: f64,
    /// Divisor applied to screen coordinates before sampling jitter noise.
    pub jitter_frequency: f64,
    /// Stamps or stipple groups per frame segment.
    pub segments: u32,
    pub brush_angle_amplitude: f64,
    pub follow_heading: bool,
    pub history_cap: usize,
    pub history_low_water: usize,
    pub history_cadence: u64,
    pub radius_map: Option<ShapeFn>,
    pub brush_lerp_map: Option<ShapeFn>,
    pub tick: Option<TickHook>,
    pub on_end: Option<EndHook>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            acceleration: DVec3::ZERO,
            radius: 1.0,
            lifespan: 100,
            speed_limit: 10.0,
            velocity_shrink: 0.995,
            radius_shrink: 0.995,
            pre_delay: 0,
            random_id: 0.0,
            render_type: RenderType::Stipple,
            brush: None,
            brush2: None,
            color: [1.0, 1.0, 1.0, 1.0],
            jitter: 2.0,
            jitter_frequency: 100.0,
            segments: 2,
            brush_angle_amplitude: 0.2,
            follow_heading: true,
            history_cap: 200,
            history_low_water: 150,
            history_cadence: 3,
            radius_map: None,
            brush_lerp_map: None,
            tick: None,
            on_end: None,
        }
    }
}

impl ParticleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Builder pattern --

    pub fn with_position(mut self, position: DVec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: DVec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_acceleration(mut self, acceleration: DVec3) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_lifespan(mut self, lifespan: i32) -> Self {
        self.lifespan = lifespan;
        self
    }

    pub fn with_speed_limit(mut self, limit: f64) -> Self {
        self.speed_limit = limit;
        self
    }

    pub fn with_velocity_shrink(mut self, factor: f64) -> Self {
        self.velocity_shrink = factor;
        self
    }

    pub fn with_radius_shrink(mut self, factor: f64) -> Self {
        self.radius_shrink = factor;
        self
    }

    pub fn with_pre_delay(mut self, ticks: i32) -> Self {
        self.pre_delay = ticks;
        self
    }

    pub fn with_random_id(mut self, id: f64) -> Self {
        self.random_id = id;
        self
    }

    pub fn with_render_type(mut self, render_type: RenderType) -> Self {
        self.render_type = render_type;
        self
    }

    pub fn with_brush(mut self, brush: BrushHandle) -> Self {
        self.brush = Some(brush);
        self
    }

    pub fn with_brush2(mut self, brush: BrushHandle) -> Self {
        self.brush2 = Some(brush);
        self
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn with_jitter(mut self, amplitude: f64, frequency: f64) -> Self {
        self.jitter = amplitude;
        self.jitter_frequency = frequency;
        self
    }

    pub fn with_segments(mut self, segments: u32) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_brush_angle_amplitude(mut self, amplitude: f64) -> Self {
        self.brush_angle_amplitude = amplitude;
        self
    }

    pub fn with_follow_heading(mut self, follow: bool) -> Self {
        self.follow_heading = follow;
        self
    }

    /// History bound: evicts down to `low_water` once `cap` is passed.
    pub fn with_history(mut self, cap: usize, low_water: usize, cadence: u64) -> Self {
        self.history_cap = cap.max(1);
        self.history_low_water = low_water.min(self.history_cap);
        self.history_cadence = cadence.max(1);
        self
    }

    pub fn with_radius_map(mut self, map: impl Fn(f64) -> f64 + 'static) -> Self {
        self.radius_map = Some(Box::new(map));
        self
    }

    pub fn with_brush_lerp_map(mut self, map: impl Fn(f64) -> f64 + 'static) -> Self {
        self.brush_lerp_map = Some(Box::new(map));
        self
    }

    pub fn with_tick(mut self, hook: impl FnMut(&mut Particle, &TickContext) + 'static) -> Self {
        self.tick = Some(Box::new(hook));
        self
    }

    pub fn on_end(mut self, hook: impl FnOnce(&Anchor) -> Vec<SpawnRequest> + 'static) -> Self {
        self.on_end = Some(Box::new(hook));
        self
    }

    pub fn build(self) -> Particle {
        Particle::from_config(self)
    }
}

/// One animated point that moves, ages, and paints a stroke each frame.
///
/// Lifecycle: Delayed (`pre_delay > 0`) → Active → Dead. The end hook fires
/// at most once and the death check never runs again after it.
pub struct Particle {
    pub random_id: f64,
    pub position: DVec3,
    pub last_position: DVec3,
    pub origin: DVec3,
    pub velocity: DVec3,
    pub acceleration: DVec3,
    pub radius: f64,
    pub speed_limit: f64,
    pub velocity_shrink: f64,
    pub radius_shrink: f64,
    pub lifespan: i32,
    original_lifespan: i32,
    pub pre_delay: i32,
    is_alive: bool,
    update_count: u32,
    history: Vec<TrailPoint>,
    history_cap: usize,
    history_low_water: usize,
    history_cadence: u64,
    pub render_type: RenderType,
    pub brush: Option<BrushHandle>,
    pub brush2: Option<BrushHandle>,
    pub color: Rgba,
    pub jitter: f64,
    pub jitter_frequency: f64,
    pub segments: u32,
    pub brush_angle_amplitude: f64,
    pub follow_heading: bool,
    radius_map: Option<ShapeFn>,
    brush_lerp_map: Option<ShapeFn>,
    tick: Option<TickHook>,
    on_end: Option<EndHook>,
}

impl Particle {
    pub fn from_config(config: ParticleConfig) -> Self {
        let history_cap = config.history_cap.max(1);
        Self {
            random_id: config.random_id,
            position: config.position,
            last_position: config.position,
            origin: config.position,
            velocity: config.velocity,
            acceleration: config.acceleration,
            radius: config.radius,
            speed_limit: config.speed_limit,
            velocity_shrink: config.velocity_shrink,
            radius_shrink: config.radius_shrink,
            lifespan: config.lifespan,
            original_lifespan: config.lifespan,
            pre_delay: config.pre_delay,
            is_alive: true,
            update_count: 0,
            history: Vec::new(),
            history_cap,
            history_low_water: config.history_low_water.min(history_cap),
            history_cadence: config.history_cadence.max(1),
            render_type: config.render_type,
            brush: config.brush,
            brush2: config.brush2,
            color: config.color,
            jitter: config.jitter,
            jitter_frequency: config.jitter_frequency,
            segments: config.segments,
            brush_angle_amplitude: config.brush_angle_amplitude,
            follow_heading: config.follow_heading,
            radius_map: config.radius_map,
            brush_lerp_map: config.brush_lerp_map,
            tick: config.tick,
            on_end: config.on_end,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.is_alive
    }

    #[inline]
    pub fn is_delayed(&self) -> bool {
        self.pre_delay > 0
    }

    pub fn original_lifespan(&self) -> i32 {
        self.original_lifespan
    }

    /// Number of active updates so far.
    pub fn update_count(&self) -> u32 {
        self.update_count
    }

    pub fn history(&self) -> &[TrailPoint] {
        &self.history
    }

    /// `lifespan / original_lifespan`, clamped to (0, 1].
    pub fn normalized_age(&self) -> f64 {
        if self.original_lifespan <= 0 {
            return 1e-6;
        }
        (self.lifespan as f64 / self.original_lifespan as f64).clamp(1e-6, 1.0)
    }

    pub fn anchor(&self) -> Anchor {
        Anchor {
            position: self.position,
            origin: self.origin,
            direction: self.velocity,
            random_id: self.random_id,
            lifespan: self.lifespan,
            original_lifespan: self.original_lifespan,
            radius: self.radius,
        }
    }

    /// Advance one frame. Returns the spawn requests of the end hook if the
    /// particle died on this step.
    pub fn update(&mut self, ctx: &TickContext) -> Vec<SpawnRequest> {
        if self.pre_delay > 0 {
            self.pre_delay -= 1;
            return Vec::new();
        }
        if self.lifespan < 0 || !self.is_alive {
            return Vec::new();
        }

        self.update_count += 1;
        self.last_position = self.position;
        self.position += self.velocity;
        self.velocity += self.acceleration;
        self.velocity = self.velocity.clamp_length_max(self.radius * self.speed_limit);
        self.velocity *= self.velocity_shrink;
        self.lifespan -= 1;
        self.radius *= self.radius_shrink;

        if (ctx.frame + self.random_id as u64) % self.history_cadence == 0 && self.is_alive {
            self.record();
        }
        if self.lifespan == self.original_lifespan - 1 {
            self.record();
        }

        let mut spawned = Vec::new();
        if self.radius < DEATH_RADIUS || self.lifespan < 0 {
            self.record();
            if let Some(on_end) = self.on_end.take() {
                spawned = on_end(&self.anchor());
            }
            self.is_alive = false;
        }

        if let Some(mut tick) = self.tick.take() {
            tick(self, ctx);
            self.tick = Some(tick);
        }
        spawned
    }

    fn record(&mut self) {
        self.history.push(TrailPoint {
            tick: self.update_count,
            position: self.position,
        });
        if self.history.len() > self.history_cap {
            let excess = self.history.len() - self.history_low_water;
            self.history.drain(..excess);
        }
    }

    /// Radius after the shape curve; never non-positive or NaN.
    pub fn calculate_radius(&self) -> f64 {
        let scale = match &self.radius_map {
            Some(map) => map(self.normalized_age()),
            None => 1.0,
        };
        let radius = self.radius * scale;
        if radius.is_nan() || radius <= 0.0 {
            MIN_DRAW_RADIUS
        } else {
            radius
        }
    }

    /// Noise offset keyed on the unjittered screen point.
    fn jittered(&self, point: DVec2, noise: &Perlin) -> DVec2 {
        let fx = point.x / self.jitter_frequency;
        let fy = point.y / self.jitter_frequency;
        DVec2::new(
            point.x + noise.signed(fx, fy, 0.0) * self.jitter,
            point.y + noise.signed(fx, fy, 5000.0) * self.jitter,
        )
    }

    /// Paint this frame's stroke. Delayed, dead and not-yet-aged particles
    /// draw nothing.
    pub fn draw(&self, ctx: &DrawContext, painter: &mut dyn Painter) {
        if self.is_delayed() || !self.is_alive || self.lifespan == self.original_lifespan {
            return;
        }

        let tail = self.jittered(ctx.view.project(self.last_position), ctx.noise);
        let head = self.jittered(ctx.view.project(self.position), ctx.noise);

        let frame_t = ctx.frame as f64;
        let natural = ctx.noise.sample2(frame_t / 50.0, self.random_id) * 5.0 + frame_t / 100.0;

        let blend = match &self.brush_lerp_map {
            Some(map) => map(self.normalized_age()),
            None => self.normalized_age(),
        };

        let trail: Vec<DVec2> = if self.render_type == RenderType::History {
            self.history.iter().map(|t| ctx.view.project(t.position)).collect()
        } else {
            Vec::new()
        };

        let stroke = StrokeFrame {
            tail,
            head,
            spin: self.brush_angle_amplitude * natural,
            follow_heading: self.follow_heading,
            radius: self.calculate_radius(),
            base_radius: self.radius,
            segments: self.segments,
            brush: self.brush,
            brush2: self.brush2,
            blend,
            color: self.color,
            trail: &trail,
            grain: ctx.noise,
            seed: self.random_id + frame_t * 0.37,
        };
        self.render_type.paint(&stroke, painter);
    }
}
