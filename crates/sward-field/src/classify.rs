//! Retention geometry for the visibility and priority classifier.
//!
//! A cell stays eligible (resident or pending) while its center is inside
//! the retention region: within the view distance of the camera and within
//! the view cone, a margin wider than the camera's half-FOV so cells do not
//! churn at the frustum edge. Both tests run in the XZ plane: cells tile
//! the terrain, and camera pitch must not evict the ground under it.

use glam::{Vec2, Vec3};
use sward_grid::{CELL_SIZE, CellCoord};

use crate::config::FieldConfig;

/// Camera state a classification pass runs against.
#[derive(Clone, Copy, Debug)]
pub struct CameraPose {
    /// World position of the viewpoint.
    pub position: Vec3,
    /// Unit forward direction.
    pub forward: Vec3,
}

impl CameraPose {
    /// Creates a pose, normalizing `forward` (degenerate input becomes +Z).
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward: forward.try_normalize().unwrap_or(Vec3::Z),
        }
    }

    /// Camera position projected onto the terrain plane.
    pub fn planar_position(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }

    /// Camera heading projected onto the terrain plane.
    ///
    /// A straight-up or straight-down view has no planar heading; +Z is
    /// used so the retention test stays total.
    pub fn planar_forward(&self) -> Vec2 {
        Vec2::new(self.forward.x, self.forward.z)
            .try_normalize()
            .unwrap_or(Vec2::Y)
    }
}

/// Distance-and-cone retention test for a cell center against the camera.
///
/// Tier-0/1 cells are exempt from this test; it governs peripheral
/// residents and pending coordinates.
pub fn within_retention(coord: CellCoord, pose: &CameraPose, config: &FieldConfig) -> bool {
    let to_center = coord.center() - pose.planar_position();
    let view_distance = config.view_distance();
    if to_center.length_squared() > view_distance * view_distance {
        return false;
    }
    within_view_cone(to_center, pose, config)
}

/// Whether a planar offset from the camera lies inside the retention cone.
fn within_view_cone(to_center: Vec2, pose: &CameraPose, config: &FieldConfig) -> bool {
    // The cell the camera stands over has no direction; always keep it.
    let Some(dir) = to_center.try_normalize() else {
        return true;
    };
    let cos = dir.dot(pose.planar_forward()).clamp(-1.0, 1.0);
    cos.acos() <= config.half_cone_radians()
}

/// Radius, in cells, of the bounding square the classifier sweeps around
/// the camera's cell.
pub fn sweep_radius(config: &FieldConfig) -> i32 {
    (config.view_distance() / CELL_SIZE).ceil() as i32
}
