//! The terrain sampling boundary consumed by the instance generator.

use glam::{Vec2, Vec3};
use noise::{NoiseFn, Perlin};

/// World rectangle covered by a terrain sampler.
///
/// Normal lookups take normalized coordinates; the extent converts world XZ
/// into that space. Out-of-range positions clamp into [0, 1] rather than
/// fail (sampling is total).
#[derive(Clone, Copy, Debug)]
pub struct TerrainExtent {
    /// World XZ of the terrain's minimum corner.
    pub origin: Vec2,
    /// World-space width (X) and depth (Z) of the terrain.
    pub size: Vec2,
}

impl TerrainExtent {
    /// Creates an extent. Degenerate sizes are bumped to a small positive
    /// span so normalization stays total.
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self {
            origin,
            size: size.max(Vec2::splat(f32::EPSILON)),
        }
    }

    /// World XZ to normalized [0, 1] coordinates, clamped.
    pub fn normalize(&self, x: f32, z: f32) -> (f32, f32) {
        let u = ((x - self.origin.x) / self.size.x).clamp(0.0, 1.0);
        let v = ((z - self.origin.y) / self.size.y).clamp(0.0, 1.0);
        (u, v)
    }

    /// Normalized coordinates back to world XZ.
    pub fn to_world(&self, u: f32, v: f32) -> Vec2 {
        self.origin + Vec2::new(u * self.size.x, v * self.size.y)
    }
}

/// Height and normal sampling over a terrain surface.
///
/// Implementations must be deterministic for fixed input; instance
/// generation reproducibility depends on it.
pub trait TerrainSampler {
    /// Terrain elevation at a world XZ position.
    fn sample_height(&self, x: f32, z: f32) -> f32;

    /// Unit surface normal at normalized terrain coordinates.
    fn sample_normal(&self, u: f32, v: f32) -> Vec3;

    /// The world rectangle this sampler covers.
    fn extent(&self) -> TerrainExtent;

    /// Lowest elevation the terrain can produce. Generated placements are
    /// clamped to never sink below it.
    fn base_elevation(&self) -> f32 {
        0.0
    }
}

/// Perlin-noise heightfield used by the demo and integration tests.
///
/// Heights are a small octave sum above `base_elevation`; normals come from
/// central differences of the height function.
pub struct NoiseTerrain {
    perlin: Perlin,
    extent: TerrainExtent,
    base_elevation: f32,
    amplitude: f32,
    frequency: f64,
}

impl NoiseTerrain {
    /// Creates a noise terrain over `extent`.
    pub fn new(
        seed: u32,
        extent: TerrainExtent,
        base_elevation: f32,
        amplitude: f32,
        frequency: f64,
    ) -> Self {
        Self {
            perlin: Perlin::new(seed),
            extent,
            base_elevation,
            amplitude,
            frequency,
        }
    }

    /// Three-octave fractal sum in [-1, 1].
    fn fbm(&self, x: f64, z: f64) -> f64 {
        let mut total = 0.0;
        let mut freq = self.frequency;
        let mut amp = 1.0;
        let mut norm = 0.0;
        for _ in 0..3 {
            total += amp * self.perlin.get([x * freq, z * freq]);
            norm += amp;
            freq *= 2.0;
            amp *= 0.5;
        }
        total / norm
    }
}

impl TerrainSampler for NoiseTerrain {
    fn sample_height(&self, x: f32, z: f32) -> f32 {
        let n = self.fbm(x as f64, z as f64) as f32;
        self.base_elevation + self.amplitude * (0.5 + 0.5 * n)
    }

    fn sample_normal(&self, u: f32, v: f32) -> Vec3 {
        let p = self.extent.to_world(u, v);
        let e = 0.5;
        let hl = self.sample_height(p.x - e, p.y);
        let hr = self.sample_height(p.x + e, p.y);
        let hd = self.sample_height(p.x, p.y - e);
        let hu = self.sample_height(p.x, p.y + e);
        Vec3::new(hl - hr, 2.0 * e, hd - hu)
            .try_normalize()
            .unwrap_or(Vec3::Y)
    }

    fn extent(&self) -> TerrainExtent {
        self.extent
    }

    fn base_elevation(&self) -> f32 {
        self.base_elevation
    }
}

/// Flat terrain at a constant height with straight-up normals.
pub struct FlatTerrain {
    pub height: f32,
}

impl FlatTerrain {
    /// Creates a flat terrain at the given elevation.
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl TerrainSampler for FlatTerrain {
    fn sample_height(&self, _x: f32, _z: f32) -> f32 {
        self.height
    }

    fn sample_normal(&self, _u: f32, _v: f32) -> Vec3 {
        Vec3::Y
    }

    fn extent(&self) -> TerrainExtent {
        TerrainExtent::new(Vec2::splat(-1.0e6), Vec2::splat(2.0e6))
    }

    fn base_elevation(&self) -> f32 {
        self.height
    }
}
