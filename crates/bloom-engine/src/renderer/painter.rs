use bytemuck::{Pod, Zeroable};
use glam::DVec2;

use crate::api::types::{BrushHandle, Rgba};

/// One brush-head image placed on the canvas, centred on `at`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stamp {
    pub brush: BrushHandle,
    pub at: DVec2,
    /// Radians, already including heading and spin.
    pub rotation: f64,
    /// Rendered width and height in screen units.
    pub size: f64,
    pub alpha: f64,
}

/// Drawing surface a particle paints onto. One method per primitive the
/// render strategies emit; texture sampling and compositing belong to the
/// implementor.
pub trait Painter {
    fn stamp(&mut self, stamp: Stamp);
    /// A single round dot of diameter `weight`.
    fn stipple(&mut self, at: DVec2, weight: f64, color: Rgba);
    /// A spray of `dots` points scattered inside `radius` around `center`.
    fn splash(&mut self, center: DVec2, radius: f64, dots: u32, color: Rgba);
    fn line(&mut self, from: DVec2, to: DVec2, weight: f64, color: Rgba);
    /// Smooth curve through the points, 1px stroke, no fill.
    fn curve(&mut self, points: &[DVec2], color: Rgba);
    fn circle(&mut self, center: DVec2, diameter: f64, color: Rgba);
}

/// Primitive tag stored in `StrokeInstance::kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StrokeKind {
    Stamp = 0,
    Stipple = 1,
    Splash = 2,
    Line = 3,
    Curve = 4,
    Circle = 5,
}

impl StrokeKind {
    pub fn from_f32(v: f32) -> Option<Self> {
        match v as u8 {
            0 => Some(StrokeKind::Stamp),
            1 => Some(StrokeKind::Stipple),
            2 => Some(StrokeKind::Splash),
            3 => Some(StrokeKind::Line),
            4 => Some(StrokeKind::Curve),
            5 => Some(StrokeKind::Circle),
            _ => None,
        }
    }
}

/// Per-primitive data read by the host canvas.
/// 12 floats = 48 bytes stride.
///
/// Field meaning depends on `kind`:
/// - Stamp: `x,y` centre, `size` edge length, `rotation`, alpha in `a`.
/// - Stipple / Circle: `x,y` centre, `size` diameter.
/// - Splash: `x,y` centre, `size` radius, `x2` dot count.
/// - Line: `x,y` to `x2,y2`, `size` weight.
/// - Curve: `x` first vertex index into the curve vertex buffer, `y` vertex count.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct StrokeInstance {
    pub kind: f32,
    /// Brush id for stamps, -1 otherwise.
    pub brush: f32,
    pub x: f32,
    pub y: f32,
    pub x2: f32,
    pub y2: f32,
    pub rotation: f32,
    pub size: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl StrokeInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    fn new(kind: StrokeKind, at: DVec2, size: f64, color: Rgba) -> Self {
        Self {
            kind: kind as u8 as f32,
            brush: -1.0,
            x: at.x as f32,
            y: at.y as f32,
            size: size as f32,
            r: color[0],
            g: color[1],
            b: color[2],
            a: color[3],
            ..Default::default()
        }
    }
}

/// A `Painter` that records strokes into flat buffers for a host renderer.
///
/// Strokes past `capacity` are dropped and counted; the host is expected to
/// size the buffer for its densest frame.
pub struct StrokeBuffer {
    instances: Vec<StrokeInstance>,
    curve_vertices: Vec<[f32; 2]>,
    capacity: usize,
    dropped: u32,
}

impl StrokeBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity.min(8192)),
            curve_vertices: Vec::new(),
            capacity,
            dropped: 0,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.curve_vertices.clear();
        self.dropped = 0;
    }

    pub fn instances(&self) -> &[StrokeInstance] {
        &self.instances
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for host-side reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    pub fn curve_vertices(&self) -> &[[f32; 2]] {
        &self.curve_vertices
    }

    pub fn curve_vertex_count(&self) -> u32 {
        self.curve_vertices.len() as u32
    }

    pub fn curve_vertices_ptr(&self) -> *const f32 {
        self.curve_vertices.as_ptr() as *const f32
    }

    /// Strokes rejected since the last clear because the buffer was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn push(&mut self, instance: StrokeInstance) -> bool {
        if self.instances.len() >= self.capacity {
            self.dropped += 1;
            return false;
        }
        self.instances.push(instance);
        true
    }
}

impl Default for StrokeBuffer {
    fn default() -> Self {
        Self::new(16_384)
    }
}

impl Painter for StrokeBuffer {
    fn stamp(&mut self, stamp: Stamp) {
        let mut inst = StrokeInstance::new(StrokeKind::Stamp, stamp.at, stamp.size, [1.0, 1.0, 1.0, 1.0]);
        inst.brush = stamp.brush.0 as f32;
        inst.rotation = stamp.rotation as f32;
        inst.a = stamp.alpha as f32;
        self.push(inst);
    }

    fn stipple(&mut self, at: DVec2, weight: f64, color: Rgba) {
        self.push(StrokeInstance::new(StrokeKind::Stipple, at, weight, color));
    }

    fn splash(&mut self, center: DVec2, radius: f64, dots: u32, color: Rgba) {
        let mut inst = StrokeInstance::new(StrokeKind::Splash, center, radius, color);
        inst.x2 = dots as f32;
        self.push(inst);
    }

    fn line(&mut self, from: DVec2, to: DVec2, weight: f64, color: Rgba) {
        let mut inst = StrokeInstance::new(StrokeKind::Line, from, weight, color);
        inst.x2 = to.x as f32;
        inst.y2 = to.y as f32;
        self.push(inst);
    }

    fn curve(&mut self, points: &[DVec2], color: Rgba) {
        if points.is_empty() {
            return;
        }
        let start = self.curve_vertices.len();
        let mut inst = StrokeInstance::new(StrokeKind::Curve, DVec2::ZERO, 1.0, color);
        inst.x = start as f32;
        inst.y = points.len() as f32;
        if self.push(inst) {
            self.curve_vertices
                .extend(points.iter().map(|p| [p.x as f32, p.y as f32]));
        }
    }

    fn circle(&mut self, center: DVec2, diameter: f64, color: Rgba) {
        self.push(StrokeInstance::new(StrokeKind::Circle, center, diameter, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn stroke_instance_is_12_floats() {
        assert_eq!(std::mem::size_of::<StrokeInstance>(), 48);
        assert_eq!(StrokeInstance::STRIDE_BYTES, 48);
    }

    #[test]
    fn stamp_records_brush_and_rotation() {
        let mut buf = StrokeBuffer::new(8);
        buf.stamp(Stamp {
            brush: BrushHandle(3),
            at: DVec2::new(10.0, -4.0),
            rotation: 0.5,
            size: 12.0,
            alpha: 0.25,
        });
        let inst = buf.instances()[0];
        assert_eq!(StrokeKind::from_f32(inst.kind), Some(StrokeKind::Stamp));
        assert_eq!(inst.brush, 3.0);
        assert_eq!((inst.x, inst.y), (10.0, -4.0));
        assert_eq!(inst.rotation, 0.5);
        assert_eq!(inst.a, 0.25);
    }

    #[test]
    fn curve_indexes_vertex_buffer() {
        let mut buf = StrokeBuffer::new(8);
        buf.curve(&[DVec2::ZERO, DVec2::ONE], RED);
        buf.curve(&[DVec2::new(5.0, 5.0)], RED);
        assert_eq!(buf.curve_vertex_count(), 3);
        let second = buf.instances()[1];
        assert_eq!((second.x, second.y), (2.0, 1.0));
    }

    #[test]
    fn empty_curve_is_ignored() {
        let mut buf = StrokeBuffer::new(8);
        buf.curve(&[], RED);
        assert_eq!(buf.instance_count(), 0);
    }

    #[test]
    fn full_buffer_drops_and_counts() {
        let mut buf = StrokeBuffer::new(2);
        for _ in 0..5 {
            buf.circle(DVec2::ZERO, 1.0, RED);
        }
        buf.curve(&[DVec2::ZERO], RED);
        assert_eq!(buf.instance_count(), 2);
        assert_eq!(buf.dropped(), 4);
        assert_eq!(buf.curve_vertex_count(), 0);

        buf.clear();
        assert_eq!(buf.instance_count(), 0);
        assert_eq!(buf.dropped(), 0);
    }

    #[test]
    fn byte_view_matches_stride() {
        let mut buf = StrokeBuffer::new(4);
        buf.line(DVec2::ZERO, DVec2::ONE, 2.0, RED);
        buf.stipple(DVec2::ONE, 1.0, RED);
        assert_eq!(buf.as_bytes().len(), 2 * StrokeInstance::STRIDE_BYTES);
    }
}
