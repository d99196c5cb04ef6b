//! Coordinates awaiting deferred generation.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use sward_grid::CellCoord;

/// FIFO queue of coordinates scheduled for generation, with a set guard
/// keeping each coordinate enqueued at most once.
///
/// Invariant: a coordinate is a member of the set if and only if it will be
/// yielded by a future [`dequeue`](Self::dequeue). Entries removed through
/// [`remove`](Self::remove) or [`retain`](Self::retain) leave at most a
/// stale queue node behind, which dequeue skips.
#[derive(Debug, Default)]
pub struct PendingQueue {
    queue: VecDeque<CellCoord>,
    pending: FxHashSet<CellCoord>,
}

impl PendingQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a coordinate. Duplicates are silently ignored.
    ///
    /// Returns true if the coordinate was newly added.
    pub fn enqueue(&mut self, coord: CellCoord) -> bool {
        if self.pending.insert(coord) {
            self.queue.push_back(coord);
            true
        } else {
            false
        }
    }

    /// Dequeues the oldest pending coordinate. Returns `None` when empty.
    pub fn dequeue(&mut self) -> Option<CellCoord> {
        while let Some(coord) = self.queue.pop_front() {
            if self.pending.remove(&coord) {
                return Some(coord);
            }
            // Entry was removed externally (e.g. force-materialized); skip it.
        }
        None
    }

    /// Removes a specific coordinate from the pending set.
    ///
    /// Returns true if it was pending.
    pub fn remove(&mut self, coord: CellCoord) -> bool {
        self.pending.remove(&coord)
    }

    /// Drops every pending coordinate for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(CellCoord) -> bool) {
        self.pending.retain(|coord| keep(*coord));
        let pending = &self.pending;
        self.queue.retain(|coord| pending.contains(coord));
    }

    /// Whether the coordinate is pending.
    pub fn contains(&self, coord: CellCoord) -> bool {
        self.pending.contains(&coord)
    }

    /// Iterates over the pending coordinates in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.pending.iter().copied()
    }

    /// Number of pending coordinates.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no coordinates are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
