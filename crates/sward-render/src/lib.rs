//! Frame output for the foliage field: frustum culling, LOD bucketing, and
//! batched instanced draw submission.
//!
//! Each frame rebuilds three per-tier transform lists from the resident
//! cells' visible prefixes, then hands them to a host [`DrawBackend`] in
//! batches no larger than [`MAX_INSTANCES_PER_BATCH`]. Tiers whose mesh or
//! material has not been discovered yet are skipped for the tick, never
//! treated as fatal.

mod bucketing;
mod frustum;
mod instance;
mod submit;
mod wind;

pub use bucketing::{BucketStats, LOD_TIERS, LodBuckets};
pub use frustum::{Frustum, view_projection};
pub use instance::GrassLodInstance;
pub use submit::{
    AssetProvider, CountingBackend, DrawBackend, FoliageRenderer, MAX_INSTANCES_PER_BATCH,
    MaterialHandle, MeshHandle, SubmitStats,
};
pub use wind::WindParams;
