//! Deterministic per-cell instance generation.
//!
//! [`generate_cell`] is a pure function of (cell coordinate, terrain
//! sampler, parameters): it places `round(CELL_SIZE² × MAX_DENSITY)`
//! instances from the cell's seeded RNG, then stable-sorts them by an
//! independent per-instance key. Any k-prefix of the result therefore
//! behaves like a deterministic random sample of size k from the full set,
//! which is what lets density changes truncate instead of resample.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::{Quat, Vec3};
use rand::Rng;
use sward_grid::{CELL_SIZE, CellCoord};

use crate::sampler::TerrainSampler;
use crate::seed::cell_rng;

/// Density ceiling in instances per square world unit. A cell's base set is
/// always generated at this density; per-tier target densities select a
/// prefix of it.
pub const MAX_DENSITY: f32 = 10.0;

/// One placed foliage element. Immutable once generated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrassInstance {
    /// World position on the terrain surface.
    pub position: Vec3,
    /// Terrain-normal alignment composed with a random yaw.
    pub rotation: Quat,
    /// Uniform scale factor.
    pub scale: f32,
    /// Deterministic key in [0, 1) fixing the visible ordering within a cell.
    pub sort_key: f32,
}

/// Parameters shared by every cell generation.
#[derive(Clone, Copy, Debug)]
pub struct ScatterParams {
    /// World seed combined with the cell coordinate to seed its RNG.
    pub world_seed: u64,
    /// Uniform scale variation range (min, max).
    pub scale_range: (f32, f32),
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            world_seed: 0,
            scale_range: (0.8, 1.2),
        }
    }
}

/// Number of instances in every cell's base set.
pub fn base_instance_count() -> usize {
    (CELL_SIZE * CELL_SIZE * MAX_DENSITY).round() as usize
}

/// Generate the full ordered instance set for a cell.
///
/// Bit-reproducible for a fixed (coordinate, sampler, params) triple. The
/// per-instance draw order (planar X, planar Z, yaw, scale, sort key) is
/// fixed; reordering the draws changes every placement for the coordinate.
pub fn generate_cell(
    coord: CellCoord,
    sampler: &dyn TerrainSampler,
    params: &ScatterParams,
) -> Vec<GrassInstance> {
    let mut rng = cell_rng(params.world_seed, coord);
    let min = coord.min_corner();
    let extent = sampler.extent();
    let base = sampler.base_elevation();
    let (scale_min, scale_max) = params.scale_range;

    let count = base_instance_count();
    let mut instances = Vec::with_capacity(count);
    for _ in 0..count {
        let x = min.x + rng.random_range(0.0..CELL_SIZE);
        let z = min.y + rng.random_range(0.0..CELL_SIZE);
        let yaw = rng.random_range(0.0..std::f32::consts::TAU);
        let scale = rng.random_range(scale_min..=scale_max);
        let sort_key = rng.random::<f32>();

        let height = sampler.sample_height(x, z).max(base);
        let (u, v) = extent.normalize(x, z);
        let normal = sampler.sample_normal(u, v).try_normalize().unwrap_or(Vec3::Y);

        instances.push(GrassInstance {
            position: Vec3::new(x, height, z),
            rotation: align_to_normal(normal) * yaw_rotation(yaw),
            scale,
            sort_key,
        });
    }

    // Stable sort by the independent key; ties keep generation order.
    instances.sort_by(|a, b| a.sort_key.total_cmp(&b.sort_key));
    instances
}

/// Rotation taking the +Y axis onto the sampled terrain normal.
fn align_to_normal(normal: Vec3) -> Quat {
    Quat::from_rotation_arc(Vec3::Y, normal)
}

/// Yaw about +Y, built with libm trig so the quaternion is identical across
/// platforms.
fn yaw_rotation(yaw: f32) -> Quat {
    let half = yaw * 0.5;
    Quat::from_xyzw(0.0, libm::sinf(half), 0.0, libm::cosf(half))
}

/// Hash a generated instance sequence to a u64 digest for determinism
/// comparison across runs.
pub fn hash_instances(instances: &[GrassInstance]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for inst in instances {
        inst.position.x.to_bits().hash(&mut hasher);
        inst.position.y.to_bits().hash(&mut hasher);
        inst.position.z.to_bits().hash(&mut hasher);
        inst.rotation.x.to_bits().hash(&mut hasher);
        inst.rotation.y.to_bits().hash(&mut hasher);
        inst.rotation.z.to_bits().hash(&mut hasher);
        inst.rotation.w.to_bits().hash(&mut hasher);
        inst.scale.to_bits().hash(&mut hasher);
        inst.sort_key.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}
