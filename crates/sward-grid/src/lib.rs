//! Grid addressing for foliage cells tiling the terrain plane.
//!
//! A [`CellCoord`] identifies one fixed-size square region of the XZ plane.
//! Coordinates are plain value types with structural equality and hashing,
//! used as map keys by the cell store.

use glam::{Vec2, Vec3};
use sward_math::Aabb;

/// Edge length of one foliage cell in world units.
pub const CELL_SIZE: f32 = 15.0;

/// Half-height of a cell's bounding column.
///
/// Cells have a fixed horizontal footprint but must tolerate any terrain
/// elevation, so the column reaches far above and below the plane. The
/// extent is finite so that plane dot products against it stay finite.
pub const COLUMN_HALF_HEIGHT: f32 = 1.0e6;

/// Identifies a foliage cell's position on the terrain plane.
///
/// Uses `i32` coordinates representing cell-grid positions (world XZ
/// divided by [`CELL_SIZE`], floored).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    /// Cell-grid X coordinate.
    pub x: i32,
    /// Cell-grid Z coordinate.
    pub z: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns the coordinate of the neighboring cell offset by `(dx, dz)`.
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// The cell containing the given world position.
    ///
    /// Floors toward negative infinity, so positions in negative space map
    /// to negative coordinates without a double-width cell at the origin.
    pub fn from_world(pos: Vec3) -> Self {
        Self {
            x: (pos.x / CELL_SIZE).floor() as i32,
            z: (pos.z / CELL_SIZE).floor() as i32,
        }
    }

    /// World-space XZ position of the cell's minimum corner.
    pub fn min_corner(self) -> Vec2 {
        Vec2::new(self.x as f32 * CELL_SIZE, self.z as f32 * CELL_SIZE)
    }

    /// World-space XZ position of the cell's center.
    pub fn center(self) -> Vec2 {
        self.min_corner() + Vec2::splat(CELL_SIZE * 0.5)
    }

    /// The eight cells forming this cell's immediate ring, in a fixed
    /// row-major order.
    pub fn ring(self) -> [CellCoord; 8] {
        [
            self.offset(-1, -1),
            self.offset(0, -1),
            self.offset(1, -1),
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(-1, 1),
            self.offset(0, 1),
            self.offset(1, 1),
        ]
    }

    /// Bounding column of this cell: exact horizontal footprint, tall
    /// vertical extent (see [`COLUMN_HALF_HEIGHT`]).
    pub fn column_bounds(self) -> Aabb {
        let min = self.min_corner();
        Aabb::new(
            Vec3::new(min.x, -COLUMN_HALF_HEIGHT, min.y),
            Vec3::new(min.x + CELL_SIZE, COLUMN_HALF_HEIGHT, min.y + CELL_SIZE),
        )
    }

    /// Squared planar distance from this cell's center to a world XZ point.
    pub fn center_distance_sq(self, point: Vec2) -> f32 {
        self.center().distance_squared(point)
    }
}

/// Iterates every coordinate in the square of `radius` cells around
/// `center`, including `center` itself, in row-major order.
pub fn square_sweep(center: CellCoord, radius: i32) -> impl Iterator<Item = CellCoord> {
    (-radius..=radius).flat_map(move |dz| (-radius..=radius).map(move |dx| center.offset(dx, dz)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_world_floors_toward_negative_infinity() {
        assert_eq!(CellCoord::from_world(Vec3::new(0.0, 5.0, 0.0)), CellCoord::new(0, 0));
        assert_eq!(
            CellCoord::from_world(Vec3::new(CELL_SIZE - 0.01, 0.0, 0.0)),
            CellCoord::new(0, 0)
        );
        assert_eq!(
            CellCoord::from_world(Vec3::new(CELL_SIZE, 0.0, 0.0)),
            CellCoord::new(1, 0)
        );
        assert_eq!(
            CellCoord::from_world(Vec3::new(-0.01, 0.0, -0.01)),
            CellCoord::new(-1, -1)
        );
    }

    #[test]
    fn test_center_lies_inside_own_cell() {
        for coord in [CellCoord::new(0, 0), CellCoord::new(-3, 7), CellCoord::new(12, -5)] {
            let c = coord.center();
            let back = CellCoord::from_world(Vec3::new(c.x, 0.0, c.y));
            assert_eq!(back, coord, "center of {coord:?} mapped back to {back:?}");
        }
    }

    #[test]
    fn test_ring_has_eight_distinct_adjacent_cells() {
        let coord = CellCoord::new(4, -2);
        let ring = coord.ring();
        assert_eq!(ring.len(), 8);
        for (i, n) in ring.iter().enumerate() {
            assert_ne!(*n, coord);
            assert!(
                (n.x - coord.x).abs() <= 1 && (n.z - coord.z).abs() <= 1,
                "ring member {i} is not adjacent: {n:?}"
            );
            for m in &ring[i + 1..] {
                assert_ne!(n, m, "ring contains a duplicate");
            }
        }
    }

    #[test]
    fn test_column_bounds_covers_any_terrain_height() {
        let bounds = CellCoord::new(2, 3).column_bounds();
        let center = CellCoord::new(2, 3).center();
        assert!(bounds.contains_point(Vec3::new(center.x, 9000.0, center.y)));
        assert!(bounds.contains_point(Vec3::new(center.x, -9000.0, center.y)));
        assert_eq!(bounds.size().x, CELL_SIZE);
        assert_eq!(bounds.size().z, CELL_SIZE);
    }

    #[test]
    fn test_column_bounds_excludes_neighbor_footprint() {
        let bounds = CellCoord::new(0, 0).column_bounds();
        let neighbor_center = CellCoord::new(1, 0).center();
        assert!(!bounds.contains_point(Vec3::new(neighbor_center.x, 0.0, neighbor_center.y)));
    }

    #[test]
    fn test_square_sweep_covers_full_square() {
        let center = CellCoord::new(1, 1);
        let cells: Vec<_> = square_sweep(center, 2).collect();
        assert_eq!(cells.len(), 25);
        assert!(cells.contains(&center));
        assert!(cells.contains(&CellCoord::new(-1, -1)));
        assert!(cells.contains(&CellCoord::new(3, 3)));
        assert!(!cells.contains(&CellCoord::new(4, 1)));
    }

    #[test]
    fn test_center_distance_sq() {
        let coord = CellCoord::new(0, 0);
        let d = coord.center_distance_sq(Vec2::new(7.5 + 3.0, 7.5 + 4.0));
        assert!((d - 25.0).abs() < 1e-4);
    }
}
