//! Terrain sampling and deterministic foliage instance generation.
//!
//! The [`TerrainSampler`] trait is the boundary to the host terrain system:
//! height lookups at world XZ and normal lookups at normalized coordinates.
//! [`generate_cell`] turns a cell coordinate plus a sampler into the cell's
//! full, reproducible instance sequence.

mod sampler;
mod scatter;
mod seed;

pub use sampler::{FlatTerrain, NoiseTerrain, TerrainExtent, TerrainSampler};
pub use scatter::{
    GrassInstance, MAX_DENSITY, ScatterParams, base_instance_count, generate_cell, hash_instances,
};
pub use seed::{cell_rng, derive_cell_seed};
