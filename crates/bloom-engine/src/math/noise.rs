//! Seeded Perlin gradient noise in the shape of a creative-coding `noise()`:
//! several octaves summed, output normalized to [0, 1].
//!
//! Deterministic for a given seed; smoothness between neighbouring inputs is
//! what the wind sway, petal wobble and stroke jitter rely on.

/// Edge-midpoint gradients of a cube (classic improved-Perlin set).
const GRADIENTS: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0], [-1.0, 1.0, 0.0], [1.0, -1.0, 0.0], [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0], [-1.0, 0.0, 1.0], [1.0, 0.0, -1.0], [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0], [0.0, -1.0, 1.0], [0.0, 1.0, -1.0], [0.0, -1.0, -1.0],
];

/// Multi-octave 3D Perlin noise source.
#[derive(Debug, Clone)]
pub struct Perlin {
    seed: u64,
    octaves: u32,
    falloff: f64,
}

impl Perlin {
    pub const DEFAULT_OCTAVES: u32 = 4;
    pub const DEFAULT_FALLOFF: f64 = 0.5;

    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            octaves: Self::DEFAULT_OCTAVES,
            falloff: Self::DEFAULT_FALLOFF,
        }
    }

    pub fn with_octaves(mut self, octaves: u32) -> Self {
        self.octaves = octaves.clamp(1, 8);
        self
    }

    pub fn with_falloff(mut self, falloff: f64) -> Self {
        self.falloff = falloff.clamp(0.01, 1.0);
        self
    }

    /// Sample at a 3D position. Output in [0, 1].
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut norm = 0.0;
        let mut frequency = 1.0;
        for octave in 0..self.octaves {
            let seed = self.seed.wrapping_add(octave as u64 * 0x9E37_79B9);
            let n = gradient_noise(x * frequency, y * frequency, z * frequency, seed);
            total += (n * 0.5 + 0.5) * amplitude;
            norm += amplitude;
            amplitude *= self.falloff;
            frequency *= 2.0;
        }
        (total / norm).clamp(0.0, 1.0)
    }

    /// Sample at a 2D position (z = 0).
    #[inline]
    pub fn sample2(&self, x: f64, y: f64) -> f64 {
        self.sample(x, y, 0.0)
    }

    /// Sample and remap from [0, 1] to [-1, 1].
    #[inline]
    pub fn signed(&self, x: f64, y: f64, z: f64) -> f64 {
        self.sample(x, y, z) * 2.0 - 1.0
    }
}

impl Default for Perlin {
    fn default() -> Self {
        Self::new(0)
    }
}

// ========== Single-octave implementation ==========

fn hash(x: i32, y: i32, z: i32, seed: u64) -> u32 {
    let mut h = (seed as u32) ^ ((seed >> 32) as u32);
    h = h.wrapping_mul(374761393);
    h = h.wrapping_add((x as u32).wrapping_mul(668265263));
    h = h.wrapping_add((y as u32).wrapping_mul(2654435761));
    h = h.wrapping_add((z as u32).wrapping_mul(3266489917));
    h ^= h >> 13;
    h = h.wrapping_mul(1274126177);
    h ^= h >> 16;
    h
}

/// Quintic fade curve.
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn corner(ix: i32, iy: i32, iz: i32, dx: f64, dy: f64, dz: f64, seed: u64) -> f64 {
    let g = GRADIENTS[(hash(ix, iy, iz, seed) % 12) as usize];
    g[0] * dx + g[1] * dy + g[2] * dz
}

/// One octave of 3D Perlin noise, roughly in [-1, 1].
fn gradient_noise(x: f64, y: f64, z: f64, seed: u64) -> f64 {
    let x0 = x.floor();
    let y0 = y.floor();
    let z0 = z.floor();
    let (ix, iy, iz) = (x0 as i32, y0 as i32, z0 as i32);
    let (fx, fy, fz) = (x - x0, y - y0, z - z0);

    let u = fade(fx);
    let v = fade(fy);
    let w = fade(fz);

    let c000 = corner(ix, iy, iz, fx, fy, fz, seed);
    let c100 = corner(ix + 1, iy, iz, fx - 1.0, fy, fz, seed);
    let c010 = corner(ix, iy + 1, iz, fx, fy - 1.0, fz, seed);
    let c110 = corner(ix + 1, iy + 1, iz, fx - 1.0, fy - 1.0, fz, seed);
    let c001 = corner(ix, iy, iz + 1, fx, fy, fz - 1.0, seed);
    let c101 = corner(ix + 1, iy, iz + 1, fx - 1.0, fy, fz - 1.0, seed);
    let c011 = corner(ix, iy + 1, iz + 1, fx, fy - 1.0, fz - 1.0, seed);
    let c111 = corner(ix + 1, iy + 1, iz + 1, fx - 1.0, fy - 1.0, fz - 1.0, seed);

    let x00 = lerp(c000, c100, u);
    let x10 = lerp(c010, c110, u);
    let x01 = lerp(c001, c101, u);
    let x11 = lerp(c011, c111, u);

    lerp(lerp(x00, x10, v), lerp(x01, x11, v), w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_input_same_output() {
        let noise = Perlin::new(99);
        for i in 0..50 {
            let t = i as f64 * 0.37;
            assert_eq!(noise.sample(t, 12.5, -t), noise.sample(t, 12.5, -t));
        }
    }

    #[test]
    fn output_in_unit_range() {
        let noise = Perlin::new(1);
        for i in 0..500 {
            let t = i as f64 * 0.173;
            let n = noise.sample(t, t * 0.5 + 40000.0, 5000.0 - t);
            assert!((0.0..=1.0).contains(&n), "noise out of range: {}", n);
        }
    }

    #[test]
    fn neighbouring_samples_are_smooth() {
        let noise = Perlin::new(3).with_octaves(1);
        let a = noise.sample(10.30, 4.0, 0.0);
        let b = noise.sample(10.31, 4.0, 0.0);
        assert!((a - b).abs() < 0.05, "jump of {} between close samples", (a - b).abs());
    }

    #[test]
    fn integer_lattice_is_midpoint_for_single_octave() {
        let noise = Perlin::new(8).with_octaves(1);
        assert!((noise.sample(3.0, -2.0, 7.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn signed_is_remapped() {
        let noise = Perlin::new(4);
        let s = noise.signed(0.3, 0.6, 0.9);
        assert!((s - (noise.sample(0.3, 0.6, 0.9) * 2.0 - 1.0)).abs() < 1e-12);
    }
}
