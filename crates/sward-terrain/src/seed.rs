//! Deterministic per-cell seed derivation.
//!
//! Combines a world seed with a cell coordinate through SipHash (std's
//! `DefaultHasher`) into a well-distributed u64, which in turn seeds a
//! `ChaCha8Rng`. The formula is load-bearing: the prefix-truncation density
//! model relies on regeneration being bit-reproducible per coordinate.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sward_grid::CellCoord;

/// Derive a u64 seed for a cell from the world seed and cell coordinate.
pub fn derive_cell_seed(world_seed: u64, coord: CellCoord) -> u64 {
    let mut hasher = DefaultHasher::new();
    world_seed.hash(&mut hasher);
    coord.x.hash(&mut hasher);
    coord.z.hash(&mut hasher);
    hasher.finish()
}

/// Derive a deterministic RNG for a specific cell.
///
/// The returned RNG produces an identical sequence for the same
/// `(world_seed, coord)` pair, regardless of when or where it is created.
pub fn cell_rng(world_seed: u64, coord: CellCoord) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_cell_seed(world_seed, coord))
}
