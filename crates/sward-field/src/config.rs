//! Runtime field configuration.
//!
//! Every setter clamps out-of-range input into its documented range instead
//! of rejecting it, so the field can never be driven into an invalid
//! configuration state.

use sward_terrain::{MAX_DENSITY, ScatterParams};

use crate::cell::Tier;

/// Runtime-mutable tuning for the foliage field.
///
/// Fields are private; mutation goes through the clamping setters.
#[derive(Clone, Debug)]
pub struct FieldConfig {
    view_distance: f32,
    densities: [f32; 3],
    lod0_distance: f32,
    lod1_distance: f32,
    fov_degrees: f32,
    cone_offset_degrees: f32,
    transition_speed: f32,
    sea_level: f32,
    scale_range: (f32, f32),
    max_admissions_per_tick: u32,
    reclassify_angle_degrees: f32,
    world_seed: u64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            view_distance: 50.0,
            densities: [10.0, 4.0, 1.0],
            lod0_distance: 20.0,
            lod1_distance: 35.0,
            fov_degrees: 90.0,
            cone_offset_degrees: 10.0,
            transition_speed: 1.0,
            sea_level: 0.0,
            scale_range: (0.8, 1.2),
            max_admissions_per_tick: 2,
            reclassify_angle_degrees: 10.0,
            world_seed: 0,
        }
    }
}

impl FieldConfig {
    /// Retention radius in world units.
    pub fn view_distance(&self) -> f32 {
        self.view_distance
    }

    /// Clamped to [10, 200].
    pub fn set_view_distance(&mut self, v: f32) {
        self.view_distance = v.clamp(10.0, 200.0);
    }

    /// Target density for a tier, in instances per square world unit.
    pub fn density(&self, tier: Tier) -> f32 {
        self.densities[tier.index()]
    }

    /// Clamped to [0.1, 10].
    pub fn set_density(&mut self, tier: Tier, v: f32) {
        self.densities[tier.index()] = v.clamp(0.1, MAX_DENSITY);
    }

    /// Distance below which an instance renders at the closest LOD.
    pub fn lod0_distance(&self) -> f32 {
        self.lod0_distance
    }

    /// Distance below which an instance renders at the middle LOD.
    pub fn lod1_distance(&self) -> f32 {
        self.lod1_distance
    }

    /// Both clamped positive; stored so that `lod0 <= lod1`.
    pub fn set_lod_distances(&mut self, lod0: f32, lod1: f32) {
        let a = lod0.max(0.0);
        let b = lod1.max(0.0);
        self.lod0_distance = a.min(b);
        self.lod1_distance = a.max(b);
    }

    /// Horizontal field of view in degrees.
    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    /// Clamped to [30, 180].
    pub fn set_fov_degrees(&mut self, v: f32) {
        self.fov_degrees = v.clamp(30.0, 180.0);
    }

    /// Margin added to the half-FOV for the retention cone, in degrees.
    pub fn cone_offset_degrees(&self) -> f32 {
        self.cone_offset_degrees
    }

    /// Clamped to [0, 90].
    pub fn set_cone_offset_degrees(&mut self, v: f32) {
        self.cone_offset_degrees = v.clamp(0.0, 90.0);
    }

    /// Half-angle of the retention cone, in radians.
    pub fn half_cone_radians(&self) -> f32 {
        (self.fov_degrees * 0.5 + self.cone_offset_degrees).to_radians()
    }

    /// Transition progress per second.
    pub fn transition_speed(&self) -> f32 {
        self.transition_speed
    }

    /// Clamped to [0.1, 5].
    pub fn set_transition_speed(&mut self, v: f32) {
        self.transition_speed = v.clamp(0.1, 5.0);
    }

    /// Elevation below which instances are not rendered. Unclamped.
    pub fn sea_level(&self) -> f32 {
        self.sea_level
    }

    pub fn set_sea_level(&mut self, v: f32) {
        self.sea_level = v;
    }

    /// Uniform scale variation range.
    pub fn scale_range(&self) -> (f32, f32) {
        self.scale_range
    }

    /// Both ends clamped positive; stored so that `min <= max`.
    pub fn set_scale_range(&mut self, min: f32, max: f32) {
        let a = min.max(0.01);
        let b = max.max(0.01);
        self.scale_range = (a.min(b), a.max(b));
    }

    /// Upper bound on cells drained from the admission queue per tick.
    pub fn max_admissions_per_tick(&self) -> u32 {
        self.max_admissions_per_tick
    }

    /// Clamped to [1, 64].
    pub fn set_max_admissions_per_tick(&mut self, v: u32) {
        self.max_admissions_per_tick = v.clamp(1, 64);
    }

    /// Camera rotation beyond this angle triggers reclassification, degrees.
    pub fn reclassify_angle_degrees(&self) -> f32 {
        self.reclassify_angle_degrees
    }

    /// Clamped to [1, 90].
    pub fn set_reclassify_angle_degrees(&mut self, v: f32) {
        self.reclassify_angle_degrees = v.clamp(1.0, 90.0);
    }

    /// Seed shared by every cell generation.
    pub fn world_seed(&self) -> u64 {
        self.world_seed
    }

    pub fn set_world_seed(&mut self, seed: u64) {
        self.world_seed = seed;
    }

    /// Generation parameters derived from this configuration.
    pub fn scatter_params(&self) -> ScatterParams {
        ScatterParams {
            world_seed: self.world_seed,
            scale_range: self.scale_range,
        }
    }
}
