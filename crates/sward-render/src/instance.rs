//! GPU-facing per-instance records.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use sward_terrain::GrassInstance;

/// One instance's model transform, laid out for direct upload to an
/// instance buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GrassLodInstance {
    /// Column-major model matrix (uniform scale, rotation, translation).
    pub model: [[f32; 4]; 4],
}

impl From<&GrassInstance> for GrassLodInstance {
    fn from(inst: &GrassInstance) -> Self {
        Self {
            model: Mat4::from_scale_rotation_translation(
                Vec3::splat(inst.scale),
                inst.rotation,
                inst.position,
            )
            .to_cols_array_2d(),
        }
    }
}
