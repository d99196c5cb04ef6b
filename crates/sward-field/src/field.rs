//! Per-tick orchestration of the cell lifecycle.

use glam::Vec3;
use sward_grid::{CellCoord, square_sweep};
use sward_terrain::{TerrainSampler, generate_cell};
use tracing::{debug, trace};

use crate::arena::CellArena;
use crate::cell::{FoliageCell, Tier};
use crate::classify::{CameraPose, sweep_radius, within_retention};
use crate::config::FieldConfig;
use crate::pending::PendingQueue;

/// Counters reported by one field tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Whether a classification pass ran this tick.
    pub classified: bool,
    /// Cells generated synchronously for tiers 0/1.
    pub generated: u32,
    /// Cells generated by draining the admission queue.
    pub admitted: u32,
    /// Resident cells evicted by the retention test.
    pub evicted: u32,
    /// Pending coordinates dropped by the retention test.
    pub pruned: u32,
}

/// Aggregate field state, for logging and diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldStats {
    /// Resident cell count.
    pub resident: usize,
    /// Coordinates awaiting generation.
    pub pending: usize,
    /// Cells with an active density transition.
    pub transitioning: usize,
    /// Sum of visible instances across all resident cells.
    pub visible_instances: usize,
}

/// The foliage field: cell store, admission queue, and the per-tick update
/// path that drives both.
///
/// All state is mutated exclusively from [`tick`](Self::tick); there are no
/// other update entry points and no interior mutability.
pub struct FoliageField {
    config: FieldConfig,
    cells: CellArena,
    pending: PendingQueue,
    last_camera_cell: Option<CellCoord>,
    last_forward: Vec3,
}

impl FoliageField {
    /// Creates an empty field with the given configuration.
    pub fn new(config: FieldConfig) -> Self {
        Self {
            config,
            cells: CellArena::new(),
            pending: PendingQueue::new(),
            last_camera_cell: None,
            last_forward: Vec3::Z,
        }
    }

    /// The current configuration.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Mutable configuration access for runtime tuning.
    pub fn config_mut(&mut self) -> &mut FieldConfig {
        &mut self.config
    }

    /// The resident cell store.
    pub fn cells(&self) -> &CellArena {
        &self.cells
    }

    /// The admission queue.
    pub fn pending(&self) -> &PendingQueue {
        &self.pending
    }

    /// Runs one tick against the camera pose.
    ///
    /// Stage order is fixed: classification (gated on cell crossing or
    /// rotation past the reclassify threshold) → bounded admission draining
    /// → transition advancement. Later stages observe the state earlier
    /// stages produced within the same tick.
    pub fn tick(
        &mut self,
        pose: &CameraPose,
        dt: f32,
        sampler: &dyn TerrainSampler,
    ) -> TickReport {
        let mut report = TickReport::default();

        if self.should_reclassify(pose) {
            self.classify(pose, sampler, &mut report);
            report.classified = true;
        }
        report.admitted = self.drain_admissions(sampler);
        self.advance_transitions(dt);

        report
    }

    /// Whether the camera has crossed a cell boundary or rotated past the
    /// threshold since the last classification.
    ///
    /// This gate is the cost control that keeps normal camera jitter from
    /// re-running the classifier every tick.
    fn should_reclassify(&self, pose: &CameraPose) -> bool {
        let Some(last_cell) = self.last_camera_cell else {
            return true;
        };
        if last_cell != CellCoord::from_world(pose.position) {
            return true;
        }
        let angle = self.last_forward.angle_between(pose.forward);
        angle > self.config.reclassify_angle_degrees().to_radians()
    }

    /// One classification pass: evict or demote peripheral residents, prune
    /// stale pending coordinates, force tiers 0/1 into residency, then sweep
    /// for new tier-2 candidates.
    fn classify(&mut self, pose: &CameraPose, sampler: &dyn TerrainSampler, report: &mut TickReport) {
        let cam_cell = CellCoord::from_world(pose.position);
        self.last_camera_cell = Some(cam_cell);
        self.last_forward = pose.forward;

        let ring = cam_cell.ring();

        // Peripheral residents: evict outside the retention region, demote
        // to Far inside it. Eviction is immediate, never faded.
        let resident: Vec<CellCoord> = self.cells.coords().collect();
        for coord in resident {
            if coord == cam_cell || ring.contains(&coord) {
                continue;
            }
            if within_retention(coord, pose, &self.config) {
                if let Some(cell) = self.cells.get_mut(coord) {
                    cell.retier(Tier::Far, &self.config);
                }
            } else {
                self.cells.remove(coord);
                report.evicted += 1;
                trace!(x = coord.x, z = coord.z, "evicted cell");
            }
        }

        // Pending coordinates face the same retention test, so generation
        // never runs for a cell the camera has already turned away from.
        let before = self.pending.len();
        let config = &self.config;
        self.pending.retain(|coord| within_retention(coord, pose, config));
        report.pruned = (before - self.pending.len()) as u32;

        // Tiers 0/1 materialize synchronously at their priority.
        self.ensure_resident(cam_cell, Tier::Near, sampler, report);
        for neighbor in ring {
            self.ensure_resident(neighbor, Tier::Ring, sampler, report);
        }

        // Everything else inside the retention region is deferred work.
        for coord in square_sweep(cam_cell, sweep_radius(&self.config)) {
            if coord == cam_cell || ring.contains(&coord) {
                continue;
            }
            if self.cells.contains(coord) || self.pending.contains(coord) {
                continue;
            }
            if within_retention(coord, pose, &self.config) {
                self.pending.enqueue(coord);
            }
        }
    }

    /// Makes a tier-0/1 cell resident at its priority: generates it if
    /// absent, hands it to the transition machinery if its tier changed.
    fn ensure_resident(
        &mut self,
        coord: CellCoord,
        tier: Tier,
        sampler: &dyn TerrainSampler,
        report: &mut TickReport,
    ) {
        // A coordinate is never both resident and pending.
        self.pending.remove(coord);

        if let Some(cell) = self.cells.get_mut(coord) {
            cell.retier(tier, &self.config);
            return;
        }

        let base = generate_cell(coord, sampler, &self.config.scatter_params());
        self.cells
            .insert(FoliageCell::new(coord, base, tier, &self.config));
        report.generated += 1;
        debug!(x = coord.x, z = coord.z, tier = tier.index(), "generated cell");
    }

    /// Drains at most `max_admissions_per_tick` pending coordinates,
    /// generating each at tier-2 density with no transition.
    fn drain_admissions(&mut self, sampler: &dyn TerrainSampler) -> u32 {
        let mut admitted = 0;
        while admitted < self.config.max_admissions_per_tick() {
            let Some(coord) = self.pending.dequeue() else {
                break;
            };
            if self.cells.contains(coord) {
                continue;
            }
            let base = generate_cell(coord, sampler, &self.config.scatter_params());
            self.cells
                .insert(FoliageCell::new(coord, base, Tier::Far, &self.config));
            admitted += 1;
            debug!(x = coord.x, z = coord.z, "admitted pending cell");
        }
        admitted
    }

    /// Advances every active density transition by `dt`.
    fn advance_transitions(&mut self, dt: f32) {
        let speed = self.config.transition_speed();
        for cell in self.cells.iter_mut() {
            cell.advance_transition(dt, speed);
        }
    }

    /// Aggregate counters over the current field state.
    pub fn stats(&self) -> FieldStats {
        let mut transitioning = 0;
        let mut visible_instances = 0;
        for cell in self.cells.iter() {
            if cell.is_transitioning() {
                transitioning += 1;
            }
            visible_instances += cell.visible_count();
        }
        FieldStats {
            resident: self.cells.len(),
            pending: self.pending.len(),
            transitioning,
            visible_instances,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sward_terrain::FlatTerrain;

    const DT: f32 = 0.016;

    fn pose_at_cell(x: i32, z: i32, forward: Vec3) -> CameraPose {
        let center = CellCoord::new(x, z).center();
        CameraPose::new(Vec3::new(center.x, 1.7, center.y), forward)
    }

    fn field() -> FoliageField {
        FoliageField::new(FieldConfig::default())
    }

    #[test]
    fn test_initial_classification_scenario() {
        // Camera in cell (0,0) facing +Z, view distance 50, FOV 90, cell 15.
        let sampler = FlatTerrain::new(0.0);
        let mut field = field();
        let pose = pose_at_cell(0, 0, Vec3::Z);

        let report = field.tick(&pose, DT, &sampler);
        assert!(report.classified);

        // Tiers 0/1 materialize synchronously this tick.
        assert_eq!(report.generated, 9);
        for dz in -1..=1 {
            for dx in -1..=1 {
                let coord = CellCoord::new(dx, dz);
                let cell = field.cells().get(coord).expect("core cell must be resident");
                let expected = if coord == CellCoord::new(0, 0) { Tier::Near } else { Tier::Ring };
                assert_eq!(cell.tier(), expected);
                assert!(!cell.is_transitioning(), "fresh cells start at full density");
            }
        }

        // (0,3): within distance and cone, so it is enqueued this tick, and
        // too deep in the FIFO to be drained by the small admission budget.
        let ahead = CellCoord::new(0, 3);
        assert!(field.pending().contains(ahead));
        assert!(!field.cells().contains(ahead));
        assert!(report.admitted <= field.config().max_admissions_per_tick());

        // (3,0): within distance but outside the ±55° cone, so neither.
        let side = CellCoord::new(3, 0);
        assert!(!field.pending().contains(side));
        assert!(!field.cells().contains(side));
    }

    #[test]
    fn test_admission_budget_holds_every_tick() {
        let sampler = FlatTerrain::new(0.0);
        let mut field = field();
        let pose = pose_at_cell(0, 0, Vec3::Z);

        for _ in 0..40 {
            let report = field.tick(&pose, DT, &sampler);
            assert!(
                report.admitted <= field.config().max_admissions_per_tick(),
                "admissions exceeded the per-tick cap"
            );
        }
        // The whole backlog eventually drains.
        assert!(field.pending().is_empty());
    }

    #[test]
    fn test_retention_consistency_after_pass() {
        let sampler = FlatTerrain::new(0.0);
        let mut field = field();
        let pose = pose_at_cell(0, 0, Vec3::Z);

        for _ in 0..10 {
            field.tick(&pose, DT, &sampler);
        }

        let cam_cell = CellCoord::from_world(pose.position);
        let ring = cam_cell.ring();
        for coord in field.cells().coords() {
            if coord == cam_cell || ring.contains(&coord) {
                continue;
            }
            assert!(
                within_retention(coord, &pose, field.config()),
                "resident cell {coord:?} fails the retention test"
            );
        }
        for coord in field.pending().iter() {
            assert!(
                within_retention(coord, &pose, field.config()),
                "pending coordinate {coord:?} fails the retention test"
            );
            assert!(
                !field.cells().contains(coord),
                "no coordinate may be resident and pending"
            );
        }
    }

    #[test]
    fn test_classification_is_gated_on_movement_and_rotation() {
        let sampler = FlatTerrain::new(0.0);
        let mut field = field();
        let pose = pose_at_cell(0, 0, Vec3::Z);

        assert!(field.tick(&pose, DT, &sampler).classified);
        assert!(!field.tick(&pose, DT, &sampler).classified, "static camera must not reclassify");

        // 5 degrees of yaw: below the 10-degree threshold.
        let slight = CameraPose::new(pose.position, Vec3::new(5f32.to_radians().sin(), 0.0, 5f32.to_radians().cos()));
        assert!(!field.tick(&slight, DT, &sampler).classified);

        // 20 degrees: past the threshold.
        let turned = CameraPose::new(pose.position, Vec3::new(20f32.to_radians().sin(), 0.0, 20f32.to_radians().cos()));
        assert!(field.tick(&turned, DT, &sampler).classified);

        // Crossing into the next cell retriggers as well.
        let moved = pose_at_cell(1, 0, Vec3::Z);
        assert!(field.tick(&moved, DT, &sampler).classified);
    }

    #[test]
    fn test_turning_away_prunes_pending_and_evicts_peripherals() {
        let sampler = FlatTerrain::new(0.0);
        let mut field = field();

        let forward = pose_at_cell(0, 0, Vec3::Z);
        field.tick(&forward, DT, &sampler);
        assert!(field.pending().contains(CellCoord::new(0, 3)) || field.cells().contains(CellCoord::new(0, 3)));

        let backward = pose_at_cell(0, 0, Vec3::NEG_Z);
        let report = field.tick(&backward, DT, &sampler);
        assert!(report.classified);

        // Ahead-of-old-camera work is gone...
        assert!(!field.pending().contains(CellCoord::new(0, 3)));
        // ...and every surviving peripheral cell satisfies the new pose.
        let cam_cell = CellCoord::new(0, 0);
        let ring = cam_cell.ring();
        for coord in field.cells().coords() {
            if coord == cam_cell || ring.contains(&coord) {
                continue;
            }
            assert!(within_retention(coord, &backward, field.config()));
        }
    }

    #[test]
    fn test_ring_survives_a_full_turn() {
        let sampler = FlatTerrain::new(0.0);
        let mut field = field();

        field.tick(&pose_at_cell(0, 0, Vec3::Z), DT, &sampler);
        field.tick(&pose_at_cell(0, 0, Vec3::NEG_Z), DT, &sampler);

        // The camera cell and its ring are exempt from the cone test; a fast
        // 180-degree turn must not make the ground pop out.
        for dz in -1..=1 {
            for dx in -1..=1 {
                assert!(
                    field.cells().contains(CellCoord::new(dx, dz)),
                    "core cell ({dx},{dz}) was evicted by a turn"
                );
            }
        }
    }

    #[test]
    fn test_eviction_is_immediate_on_leaving_the_region() {
        let sampler = FlatTerrain::new(0.0);
        let mut field = field();

        field.tick(&pose_at_cell(0, 0, Vec3::Z), DT, &sampler);
        assert!(field.cells().contains(CellCoord::new(0, 0)));

        // Teleport far away: the old neighborhood fails the distance test and
        // is removed the same tick, with no fade.
        let report = field.tick(&pose_at_cell(100, 100, Vec3::Z), DT, &sampler);
        assert!(report.evicted >= 9);
        assert!(!field.cells().contains(CellCoord::new(0, 0)));
        assert!(!field.cells().contains(CellCoord::new(1, 1)));
    }

    #[test]
    fn test_tier_change_transitions_without_regeneration() {
        let sampler = FlatTerrain::new(0.0);
        let mut field = field();

        // Make (0,3) the camera cell: it materializes at Near density.
        field.tick(&pose_at_cell(0, 3, Vec3::Z), DT, &sampler);
        let full = field.cells().get(CellCoord::new(0, 3)).map(|c| c.visible_count());
        let full = full.expect("camera cell resident");
        assert_eq!(full, field.cells().get(CellCoord::new(0, 3)).map(|c| c.base_len()).expect("resident"));

        // Step back to (0,0): (0,3) is still retained but now peripheral, so
        // it fades toward Far density instead of being rebuilt.
        field.tick(&pose_at_cell(0, 0, Vec3::Z), DT, &sampler);
        let cell = field.cells().get(CellCoord::new(0, 3)).expect("still resident");
        assert_eq!(cell.tier(), Tier::Far);
        assert!(cell.is_transitioning(), "a regenerated cell would be stable");
        assert_eq!(cell.transition_start_count(), full);

        // After 1/transition_speed seconds of accumulated time the count
        // lands exactly on the Far target.
        for _ in 0..70 {
            field.tick(&pose_at_cell(0, 0, Vec3::Z), DT, &sampler);
        }
        let cell = field.cells().get(CellCoord::new(0, 3)).expect("still resident");
        assert!(!cell.is_transitioning());
        assert_eq!(
            cell.visible_count(),
            crate::cell::target_count(cell.base_len(), Tier::Far, field.config())
        );

        // Walking back onto it promotes the same cell to Near, again through
        // the transition machinery.
        let report = field.tick(&pose_at_cell(0, 3, Vec3::Z), DT, &sampler);
        assert!(report.classified);
        let cell = field.cells().get(CellCoord::new(0, 3)).expect("still resident");
        assert_eq!(cell.tier(), Tier::Near);
        assert!(cell.is_transitioning());
        for _ in 0..70 {
            field.tick(&pose_at_cell(0, 3, Vec3::Z), DT, &sampler);
        }
        let cell = field.cells().get(CellCoord::new(0, 3)).expect("still resident");
        assert_eq!(cell.visible_count(), cell.base_len());
    }

    #[test]
    fn test_visible_counts_stay_within_base_bounds() {
        let sampler = FlatTerrain::new(0.0);
        let mut field = field();

        // Wander and spin for a while.
        for i in 0..50 {
            let cell_x = i / 10;
            let yaw = (i as f32 * 9.0).to_radians();
            let pose = pose_at_cell(cell_x, 0, Vec3::new(yaw.sin(), 0.0, yaw.cos()));
            field.tick(&pose, DT, &sampler);

            for cell in field.cells().iter() {
                assert!(cell.visible_count() <= cell.base_len());
                assert!(cell.target_count() <= cell.base_len());
            }
        }
    }

    #[test]
    fn test_stats_aggregate_field_state() {
        let sampler = FlatTerrain::new(0.0);
        let mut field = field();
        field.tick(&pose_at_cell(0, 0, Vec3::Z), DT, &sampler);

        let stats = field.stats();
        assert_eq!(stats.resident, field.cells().len());
        assert_eq!(stats.pending, field.pending().len());
        assert!(stats.visible_instances > 0);
        assert_eq!(stats.transitioning, 0, "fresh cells are stable");
    }
}
