use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{BrushHandle, Rgba};
use crate::math::Perlin;
use crate::renderer::painter::{Painter, Stamp};

/// Dots sprayed by a splash stroke.
pub const SPLASH_DOTS: u32 = 350;
/// Overdraw passes of a line stroke.
pub const LINE_PASSES: u32 = 3;
const LINE_ALPHA: f32 = 0.01;
const STIPPLE_DOTS: u32 = 3;

/// How a particle turns its per-frame motion into marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderType {
    /// Brush-head stamps interpolated along the frame's motion.
    BrushImage,
    /// Like `BrushImage`, cross-fading two brushes by remaining life.
    BrushImageLerp,
    /// Stippled dots along the motion segment.
    #[default]
    Stipple,
    /// A spray of dots around the particle.
    Splash,
    /// A faint wide line from the previous to the current position.
    Line,
    /// A 1px curve through the recorded trail.
    History,
    /// A filled circle; also the fallback for unknown names.
    Circle,
}

impl RenderType {
    /// Parse a strategy name. Unknown names fall back to `Circle`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "brush_image" | "brushImage" => RenderType::BrushImage,
            "brush_image_lerp" | "brushImageLerp" => RenderType::BrushImageLerp,
            "stipple" | "brush" => RenderType::Stipple,
            "splash" => RenderType::Splash,
            "line" => RenderType::Line,
            "history" => RenderType::History,
            _ => RenderType::Circle,
        }
    }

    /// Emit this frame's marks.
    pub fn paint(self, frame: &StrokeFrame, painter: &mut dyn Painter) {
        match self {
            RenderType::BrushImage => match frame.brush {
                Some(brush) => stamp_along(frame, brush, 1.0, painter),
                None => paint_circle(frame, painter),
            },
            RenderType::BrushImageLerp => match frame.brush {
                Some(brush) => {
                    stamp_along(frame, brush, frame.blend, painter);
                    if let Some(second) = frame.brush2 {
                        stamp_along(frame, second, 1.0 - frame.blend, painter);
                    }
                }
                None => paint_circle(frame, painter),
            },
            RenderType::Stipple => paint_stipple(frame, painter),
            RenderType::Splash => {
                painter.splash(frame.tail, frame.base_radius * 0.5, SPLASH_DOTS, frame.color)
            }
            RenderType::Line => {
                let mut color = frame.color;
                color[3] = LINE_ALPHA;
                for _ in 0..LINE_PASSES {
                    painter.line(frame.tail, frame.head, frame.base_radius * 8.0, color);
                }
            }
            RenderType::History => {
                if !frame.trail.is_empty() {
                    painter.curve(frame.trail, frame.color);
                }
            }
            RenderType::Circle => paint_circle(frame, painter),
        }
    }
}

/// Screen-space inputs for one particle's marks this frame.
pub struct StrokeFrame<'a> {
    /// Previous position, projected and jittered.
    pub tail: DVec2,
    /// Current position, projected and jittered.
    pub head: DVec2,
    /// Brush spin in radians, added to every stamp.
    pub spin: f64,
    /// Rotate stamps to the tail→head heading.
    pub follow_heading: bool,
    /// Shaped radius for this frame.
    pub radius: f64,
    /// Unshaped physical radius.
    pub base_radius: f64,
    pub segments: u32,
    pub brush: Option<BrushHandle>,
    pub brush2: Option<BrushHandle>,
    /// Opacity of `brush`; `brush2` gets the complement.
    pub blend: f64,
    pub color: Rgba,
    /// Projected trail, only filled for `History`.
    pub trail: &'a [DVec2],
    pub grain: &'a Perlin,
    /// Per-particle, per-frame noise offset for stipple scatter.
    pub seed: f64,
}

impl StrokeFrame<'_> {
    /// Screen angle of the tail→head motion.
    pub fn heading(&self) -> f64 {
        let d = self.head - self.tail;
        d.y.atan2(d.x)
    }
}

fn stamp_along(frame: &StrokeFrame, brush: BrushHandle, alpha: f64, painter: &mut dyn Painter) {
    let mut rotation = frame.spin;
    if frame.follow_heading {
        rotation += frame.heading();
    }
    for i in 0..frame.segments {
        let t = i as f64 / frame.segments as f64;
        painter.stamp(Stamp {
            brush,
            at: frame.tail.lerp(frame.head, t),
            rotation,
            size: frame.radius,
            alpha,
        });
    }
}

fn paint_stipple(frame: &StrokeFrame, painter: &mut dyn Painter) {
    let weight = frame.radius * 0.8;
    for i in 0..frame.segments {
        let at = frame.tail.lerp(frame.head, i as f64 / frame.segments as f64);
        for j in 0..STIPPLE_DOTS {
            let k = (i * STIPPLE_DOTS + j) as f64;
            let dx = frame.grain.signed(frame.seed, k * 0.61, 11.0);
            let dy = frame.grain.signed(frame.seed, k * 0.61, 23.0);
            painter.stipple(at + DVec2::new(dx, dy) * 1.2, weight, frame.color);
        }
    }
}

fn paint_circle(frame: &StrokeFrame, painter: &mut dyn Painter) {
    painter.circle(frame.tail, frame.radius, frame.color);
}
