//! Per-frame LOD bucketing and culling.
//!
//! Membership and visible counts shift continuously under transitions and
//! camera motion, so the tier lists are rebuilt from scratch every frame
//! rather than diffed incrementally; allocations are reused across frames.

use glam::Vec3;
use sward_field::FoliageField;

use crate::frustum::Frustum;
use crate::instance::GrassLodInstance;

/// Number of LOD tiers instances are bucketed into.
pub const LOD_TIERS: usize = 3;

/// Counters from one bucketing pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BucketStats {
    /// Resident cells whose bounds intersected the frustum.
    pub cells_visible: usize,
    /// Resident cells rejected by the frustum test.
    pub cells_culled: usize,
    /// Instances skipped for sitting below the sea level.
    pub below_sea_level: usize,
}

/// The three per-tier instance lists produced for the renderer each frame.
#[derive(Debug, Default)]
pub struct LodBuckets {
    tiers: [Vec<GrassLodInstance>; LOD_TIERS],
}

impl LodBuckets {
    /// Creates empty buckets.
    pub fn new() -> Self {
        Self::default()
    }

    /// The instance list for one LOD tier.
    pub fn tier(&self, tier: usize) -> &[GrassLodInstance] {
        &self.tiers[tier]
    }

    /// Total instances across all tiers.
    pub fn total(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }

    /// Appends an instance to a tier directly.
    pub fn push(&mut self, tier: usize, instance: GrassLodInstance) {
        self.tiers[tier].push(instance);
    }

    /// Empties every tier, keeping allocated capacity for the next frame.
    pub fn clear(&mut self) {
        for tier in &mut self.tiers {
            tier.clear();
        }
    }

    /// Rebuilds the tier lists from the field.
    ///
    /// For every resident cell whose bounds intersect the frustum, walks the
    /// cell's visible prefix, skips instances below the configured sea
    /// level, and places each remaining instance into exactly one tier by
    /// straight-line distance to the camera.
    pub fn rebuild(
        &mut self,
        field: &FoliageField,
        camera_position: Vec3,
        frustum: &Frustum,
    ) -> BucketStats {
        self.clear();

        let config = field.config();
        let sea_level = config.sea_level();
        let lod0_sq = config.lod0_distance() * config.lod0_distance();
        let lod1_sq = config.lod1_distance() * config.lod1_distance();

        let mut stats = BucketStats::default();
        for cell in field.cells().iter() {
            if !frustum.is_visible(cell.bounds()) {
                stats.cells_culled += 1;
                continue;
            }
            stats.cells_visible += 1;

            for inst in cell.visible() {
                if inst.position.y < sea_level {
                    stats.below_sea_level += 1;
                    continue;
                }
                let dist_sq = inst.position.distance_squared(camera_position);
                let tier = if dist_sq < lod0_sq {
                    0
                } else if dist_sq < lod1_sq {
                    1
                } else {
                    2
                };
                self.tiers[tier].push(inst.into());
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frustum::view_projection;
    use sward_field::{CameraPose, FieldConfig, FoliageField};
    use sward_terrain::FlatTerrain;

    const DT: f32 = 0.016;

    fn ticked_field(sampler: &FlatTerrain, pose: &CameraPose) -> FoliageField {
        let mut field = FoliageField::new(FieldConfig::default());
        for _ in 0..5 {
            field.tick(pose, DT, sampler);
        }
        field
    }

    fn frustum_for(pose: &CameraPose, view_distance: f32) -> Frustum {
        let vp = view_projection(pose.position, pose.forward, 90.0, 16.0 / 9.0, 0.1, view_distance);
        Frustum::from_view_projection(&vp)
    }

    #[test]
    fn test_rebuild_fills_tiers_from_resident_cells() {
        let sampler = FlatTerrain::new(0.0);
        let pose = CameraPose::new(Vec3::new(7.5, 1.7, 7.5), Vec3::Z);
        let field = ticked_field(&sampler, &pose);

        let mut buckets = LodBuckets::new();
        let stats = buckets.rebuild(&field, pose.position, &frustum_for(&pose, 50.0));

        assert!(stats.cells_visible > 0);
        assert!(stats.cells_culled > 0, "cells behind the camera should be culled");
        assert!(buckets.total() > 0);
        // Flat terrain at y=0 with sea level 0: nothing is submerged.
        assert_eq!(stats.below_sea_level, 0);
    }

    #[test]
    fn test_instances_below_sea_level_are_skipped() {
        let sampler = FlatTerrain::new(-5.0);
        let pose = CameraPose::new(Vec3::new(7.5, 1.7, 7.5), Vec3::Z);
        let field = ticked_field(&sampler, &pose);

        let mut buckets = LodBuckets::new();
        let stats = buckets.rebuild(&field, pose.position, &frustum_for(&pose, 50.0));

        assert_eq!(buckets.total(), 0, "submerged instances must not render");
        assert!(stats.below_sea_level > 0);
    }

    #[test]
    fn test_distance_tiers_partition_instances() {
        let sampler = FlatTerrain::new(0.0);
        let pose = CameraPose::new(Vec3::new(7.5, 1.7, 7.5), Vec3::Z);
        let field = ticked_field(&sampler, &pose);

        let mut buckets = LodBuckets::new();
        buckets.rebuild(&field, pose.position, &frustum_for(&pose, 50.0));

        // The camera stands on the ground, so instances exist in every band:
        // under 20 (tier 0), 20..35 (tier 1), beyond 35 (tier 2).
        assert!(!buckets.tier(0).is_empty());
        assert!(!buckets.tier(1).is_empty());
        assert!(!buckets.tier(2).is_empty());
        assert_eq!(
            buckets.total(),
            buckets.tier(0).len() + buckets.tier(1).len() + buckets.tier(2).len()
        );
    }

    #[test]
    fn test_distant_camera_pushes_everything_to_the_far_tier() {
        let sampler = FlatTerrain::new(0.0);
        let pose = CameraPose::new(Vec3::new(7.5, 1.7, 7.5), Vec3::Z);
        let field = ticked_field(&sampler, &pose);

        // Viewpoint hoisted 100 units up: every instance is beyond the
        // 35-unit lod1 distance.
        let high = Vec3::new(7.5, 100.0, 7.5);
        let vp = view_projection(high, Vec3::new(0.0, -0.5, 1.0).normalize(), 90.0, 1.0, 0.1, 400.0);
        let mut buckets = LodBuckets::new();
        buckets.rebuild(&field, high, &Frustum::from_view_projection(&vp));

        assert!(buckets.total() > 0);
        assert!(buckets.tier(0).is_empty());
        assert!(buckets.tier(1).is_empty());
        assert_eq!(buckets.tier(2).len(), buckets.total());
    }

    #[test]
    fn test_rebuild_replaces_rather_than_accumulates() {
        let sampler = FlatTerrain::new(0.0);
        let pose = CameraPose::new(Vec3::new(7.5, 1.7, 7.5), Vec3::Z);
        let field = ticked_field(&sampler, &pose);
        let frustum = frustum_for(&pose, 50.0);

        let mut buckets = LodBuckets::new();
        buckets.rebuild(&field, pose.position, &frustum);
        let first = buckets.total();
        buckets.rebuild(&field, pose.position, &frustum);

        assert_eq!(buckets.total(), first, "rebuild must start from empty lists");
    }
}
