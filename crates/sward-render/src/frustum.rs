//! Frustum culling using f32 AABB tests against view-projection planes.

use glam::{Mat4, Vec3, Vec4};
use sward_math::Aabb;

/// Plane indices into the frustum planes array.
const LEFT: usize = 0;
const RIGHT: usize = 1;
const BOTTOM: usize = 2;
const TOP: usize = 3;
const NEAR: usize = 4;
const FAR: usize = 5;

/// A view frustum defined by six inward-pointing planes extracted from
/// the view-projection matrix.
#[derive(Clone, Debug)]
pub struct Frustum {
    /// Six planes: left, right, bottom, top, near, far.
    /// Each `Vec4(a, b, c, d)` where `(a,b,c)` is the normalized inward
    /// normal and `d` is the signed distance term.
    planes: [Vec4; 6],
}

impl Frustum {
    /// Extract frustum planes from a combined view-projection matrix
    /// using the Griggs-Hartmann method.
    ///
    /// Assumes a [0, 1] depth range (glam's `perspective_rh` family): the
    /// near clip constraint is `z >= 0`, so the near plane is row 2 and the
    /// far plane row 3 minus row 2.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let rows = [vp.row(0), vp.row(1), vp.row(2), vp.row(3)];

        let mut planes = [Vec4::ZERO; 6];
        planes[LEFT] = rows[3] + rows[0];
        planes[RIGHT] = rows[3] - rows[0];
        planes[BOTTOM] = rows[3] + rows[1];
        planes[TOP] = rows[3] - rows[1];
        planes[NEAR] = rows[2];
        planes[FAR] = rows[3] - rows[2];

        // Normalize each plane so that (a,b,c) is a unit vector.
        for plane in &mut planes {
            let len = plane.truncate().length();
            if len > 0.0 {
                *plane /= len;
            }
        }

        Self { planes }
    }

    /// Test whether an AABB is at least partially inside the frustum.
    ///
    /// Uses the p-vertex (positive vertex) method: for each plane, find
    /// the corner of the AABB furthest along the plane normal. If that
    /// corner is behind the plane, the entire AABB is outside.
    ///
    /// This is conservative: it may return `true` for some AABBs that
    /// are fully outside (false positives near frustum corners), but
    /// never returns `false` for visible objects.
    pub fn is_visible(&self, aabb: &Aabb) -> bool {
        for plane in &self.planes {
            let normal = plane.truncate();
            let d = plane.w;

            // Positive vertex: the corner furthest along the plane normal.
            let p = Vec3::new(
                if normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );

            if normal.dot(p) + d < 0.0 {
                return false;
            }
        }
        true
    }
}

/// Build a view-projection matrix from camera parameters.
///
/// `fov_x_degrees` is the horizontal field of view; it is converted to the
/// vertical FOV the projection expects using the aspect ratio.
pub fn view_projection(
    position: Vec3,
    forward: Vec3,
    fov_x_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
) -> Mat4 {
    let half_x = (fov_x_degrees.to_radians() * 0.5).tan();
    let fov_y = 2.0 * (half_x / aspect).atan();
    let proj = Mat4::perspective_rh(fov_y, aspect, near, far);
    let view = Mat4::look_at_rh(position, position + forward, Vec3::Y);
    proj * view
}
