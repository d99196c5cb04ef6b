//! The cell store: an arena of cell records with a coordinate lookup.
//!
//! Records live in index-addressed slots; the coordinate→slot map is the
//! only path in. The classifier, transition, and bucketing passes each walk
//! the arena sequentially, so no pass ever holds two references to the same
//! record.

use rustc_hash::FxHashMap;
use sward_grid::CellCoord;

use crate::cell::FoliageCell;

/// Owns every resident cell and provides O(1) lookup by [`CellCoord`].
///
/// This is the single authority for which cells exist. Freed slots are
/// recycled through a free list, so long camera paths do not grow the slot
/// vector past the working-set high-water mark.
#[derive(Debug, Default)]
pub struct CellArena {
    slots: Vec<Option<FoliageCell>>,
    index: FxHashMap<CellCoord, usize>,
    free: Vec<usize>,
}

impl CellArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a cell, keyed by its own coordinate, and returns its slot.
    ///
    /// If a cell already exists at this coordinate it is replaced in place
    /// (idempotent reload).
    pub fn insert(&mut self, cell: FoliageCell) -> usize {
        let coord = cell.coord();
        if let Some(&slot) = self.index.get(&coord) {
            self.slots[slot] = Some(cell);
            return slot;
        }
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(cell);
                slot
            }
            None => {
                self.slots.push(Some(cell));
                self.slots.len() - 1
            }
        };
        self.index.insert(coord, slot);
        slot
    }

    /// Removes and returns the cell at the given coordinate.
    pub fn remove(&mut self, coord: CellCoord) -> Option<FoliageCell> {
        let slot = self.index.remove(&coord)?;
        let cell = self.slots[slot].take();
        self.free.push(slot);
        cell
    }

    /// Immutable access to a resident cell.
    pub fn get(&self, coord: CellCoord) -> Option<&FoliageCell> {
        self.index
            .get(&coord)
            .and_then(|&slot| self.slots[slot].as_ref())
    }

    /// Mutable access to a resident cell.
    pub fn get_mut(&mut self, coord: CellCoord) -> Option<&mut FoliageCell> {
        let slot = *self.index.get(&coord)?;
        self.slots[slot].as_mut()
    }

    /// Whether a cell is resident at the coordinate.
    pub fn contains(&self, coord: CellCoord) -> bool {
        self.index.contains_key(&coord)
    }

    /// Number of resident cells.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether no cells are resident.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterates over the coordinates of all resident cells.
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.index.keys().copied()
    }

    /// Iterates over all resident cells.
    pub fn iter(&self) -> impl Iterator<Item = &FoliageCell> {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }

    /// Mutable iteration over all resident cells.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FoliageCell> {
        self.slots.iter_mut().filter_map(|slot| slot.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Tier;
    use crate::config::FieldConfig;

    fn cell(x: i32, z: i32) -> FoliageCell {
        FoliageCell::new(CellCoord::new(x, z), Vec::new(), Tier::Far, &FieldConfig::default())
    }

    #[test]
    fn test_insert_then_get_returns_some() {
        let mut arena = CellArena::new();
        arena.insert(cell(0, 0));

        let got = arena.get(CellCoord::new(0, 0));
        assert!(got.is_some());
        assert_eq!(got.map(|c| c.coord()), Some(CellCoord::new(0, 0)));
    }

    #[test]
    fn test_remove_then_get_returns_none() {
        let mut arena = CellArena::new();
        arena.insert(cell(1, 2));

        let removed = arena.remove(CellCoord::new(1, 2));
        assert!(removed.is_some());
        assert!(arena.get(CellCoord::new(1, 2)).is_none());
    }

    #[test]
    fn test_len_tracks_correctly() {
        let mut arena = CellArena::new();
        assert_eq!(arena.len(), 0);

        arena.insert(cell(0, 0));
        arena.insert(cell(1, 0));
        arena.insert(cell(0, 1));
        assert_eq!(arena.len(), 3);

        arena.remove(CellCoord::new(1, 0));
        assert_eq!(arena.len(), 2);

        // Removing a non-existent coordinate doesn't change the count.
        assert!(arena.remove(CellCoord::new(99, 99)).is_none());
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_double_insert_is_idempotent() {
        let mut arena = CellArena::new();
        let first = arena.insert(cell(5, 5));
        let second = arena.insert(cell(5, 5));

        assert_eq!(first, second, "re-insert must reuse the same slot");
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_freed_slots_are_recycled() {
        let mut arena = CellArena::new();
        let slot_a = arena.insert(cell(0, 0));
        arena.remove(CellCoord::new(0, 0));
        let slot_b = arena.insert(cell(7, -7));

        assert_eq!(slot_a, slot_b, "a freed slot should be reused");
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_iter_yields_every_resident_cell() {
        let mut arena = CellArena::new();
        arena.insert(cell(0, 0));
        arena.insert(cell(1, 1));
        arena.insert(cell(-2, 3));
        arena.remove(CellCoord::new(1, 1));

        let mut coords: Vec<CellCoord> = arena.iter().map(|c| c.coord()).collect();
        coords.sort();
        assert_eq!(coords, vec![CellCoord::new(-2, 3), CellCoord::new(0, 0)]);
        assert_eq!(arena.coords().count(), 2);
    }
}
