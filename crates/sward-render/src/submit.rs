//! Batched draw submission with per-tick asset discovery.

use tracing::debug;

use crate::bucketing::{LOD_TIERS, LodBuckets};
use crate::instance::GrassLodInstance;
use crate::wind::WindParams;

/// Largest number of instances a single instanced draw may carry.
pub const MAX_INSTANCES_PER_BATCH: usize = 1023;

/// Opaque host handle to a foliage mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// Opaque host handle to a foliage material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u64);

/// Host-side discovery of per-tier mesh/material assets.
pub trait AssetProvider {
    /// The mesh and material for an LOD tier, or `None` while unavailable.
    fn tier_assets(&self, tier: usize) -> Option<(MeshHandle, MaterialHandle)>;
}

/// Instanced draw submission into the host renderer.
pub trait DrawBackend {
    /// Draw `instances.len()` copies of `mesh` with `material`.
    ///
    /// Callers never pass more than [`MAX_INSTANCES_PER_BATCH`] instances.
    fn submit(&mut self, mesh: MeshHandle, material: MaterialHandle, instances: &[GrassLodInstance]);

    /// Update a material's wind uniforms.
    fn set_wind(&mut self, material: MaterialHandle, wind: &WindParams);
}

/// Per-frame counters from a render pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubmitStats {
    /// Instanced draw calls issued.
    pub draw_calls: u32,
    /// Instances submitted across all draws.
    pub instances: usize,
    /// Tiers skipped because their assets are not available.
    pub tiers_skipped: u32,
}

/// Issues the per-tier instanced draws for a frame.
///
/// A tier whose mesh or material has not been discovered is skipped for the
/// tick (zero instances, zero draw calls) and discovery is retried every
/// tick until the host can satisfy it. Missing assets degrade visuals, they
/// never stop the system.
#[derive(Debug, Default)]
pub struct FoliageRenderer {
    assets: [Option<(MeshHandle, MaterialHandle)>; LOD_TIERS],
}

impl FoliageRenderer {
    /// Creates a renderer with no assets discovered yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-queries the provider for any tier still missing assets.
    pub fn refresh_assets(&mut self, provider: &dyn AssetProvider) {
        for (tier, slot) in self.assets.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = provider.tier_assets(tier);
            }
        }
    }

    /// Whether a tier currently has assets to draw with.
    pub fn has_assets(&self, tier: usize) -> bool {
        self.assets[tier].is_some()
    }

    /// Pushes wind uniforms and submits every tier's batches.
    pub fn render(
        &self,
        buckets: &LodBuckets,
        wind: &WindParams,
        backend: &mut dyn DrawBackend,
    ) -> SubmitStats {
        let mut stats = SubmitStats::default();

        for tier in 0..LOD_TIERS {
            let Some((mesh, material)) = self.assets[tier] else {
                stats.tiers_skipped += 1;
                debug!(tier, "skipping foliage tier without assets");
                continue;
            };

            backend.set_wind(material, wind);

            for batch in buckets.tier(tier).chunks(MAX_INSTANCES_PER_BATCH) {
                backend.submit(mesh, material, batch);
                stats.draw_calls += 1;
                stats.instances += batch.len();
            }
        }
        stats
    }
}

/// Backend that records what would be drawn, for the demo and tests.
#[derive(Debug, Default)]
pub struct CountingBackend {
    /// One entry per submitted batch: mesh, material, instance count.
    pub submissions: Vec<(MeshHandle, MaterialHandle, usize)>,
    /// Materials that received wind uniforms, in push order.
    pub wind_pushes: Vec<MaterialHandle>,
}

impl DrawBackend for CountingBackend {
    fn submit(&mut self, mesh: MeshHandle, material: MaterialHandle, instances: &[GrassLodInstance]) {
        self.submissions.push((mesh, material, instances.len()));
    }

    fn set_wind(&mut self, material: MaterialHandle, _wind: &WindParams) {
        self.wind_pushes.push(material);
    }
}
