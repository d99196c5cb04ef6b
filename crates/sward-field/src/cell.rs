//! Cell records and the density transition state machine.

use sward_grid::CellCoord;
use sward_math::{Aabb, lerp};
use sward_terrain::{GrassInstance, MAX_DENSITY};

use crate::config::FieldConfig;

/// Priority tier of a resident cell.
///
/// Tier is a function of camera geometry, never of cell identity: a cell
/// moves between tiers through the transition machinery without
/// regeneration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    /// The camera's own cell (priority 0, highest density).
    Near,
    /// The eight cells of the camera's immediate ring (priority 1).
    Ring,
    /// Any other retained cell inside the view cone (priority 2).
    Far,
}

impl Tier {
    /// Numeric priority, 0 = closest.
    pub fn index(self) -> usize {
        match self {
            Tier::Near => 0,
            Tier::Ring => 1,
            Tier::Far => 2,
        }
    }
}

/// Visible-prefix length for a base set of `len` instances at the tier's
/// configured density.
pub fn target_count(len: usize, tier: Tier, config: &FieldConfig) -> usize {
    let frac = config.density(tier) / MAX_DENSITY;
    ((len as f32 * frac).round() as usize).min(len)
}

/// One resident cell: its full deterministic instance set plus the state
/// controlling how much of it is currently visible.
///
/// Invariant: `visible_count <= base.len()` at all times; the visible prefix
/// is always a valid index range into the base set. `visible_count` changes
/// only through [`advance_transition`](Self::advance_transition) or the
/// immediate assignment at creation.
#[derive(Clone, Debug)]
pub struct FoliageCell {
    coord: CellCoord,
    base: Vec<GrassInstance>,
    bounds: Aabb,
    tier: Tier,
    visible_count: usize,
    target_count: usize,
    transition_start_count: usize,
    transition_progress: f32,
    transitioning: bool,
}

impl FoliageCell {
    /// Creates a cell at the full target count for `tier`.
    ///
    /// Newly generated cells skip the transition: they come into existence
    /// already at the density their tier asks for.
    pub fn new(coord: CellCoord, base: Vec<GrassInstance>, tier: Tier, config: &FieldConfig) -> Self {
        let target = target_count(base.len(), tier, config);
        Self {
            coord,
            bounds: coord.column_bounds(),
            base,
            tier,
            visible_count: target,
            target_count: target,
            transition_start_count: target,
            transition_progress: 1.0,
            transitioning: false,
        }
    }

    /// The cell's grid coordinate.
    pub fn coord(&self) -> CellCoord {
        self.coord
    }

    /// The cell's bounding column.
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Current priority tier.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Length of the full generated instance set.
    pub fn base_len(&self) -> usize {
        self.base.len()
    }

    /// Number of instances currently visible.
    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    /// Whether a density transition is in progress.
    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Visible count the active (or last) transition is heading toward.
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// Visible count recorded when the active transition started.
    pub fn transition_start_count(&self) -> usize {
        self.transition_start_count
    }

    /// The currently visible prefix of the base set.
    pub fn visible(&self) -> &[GrassInstance] {
        &self.base[..self.visible_count]
    }

    /// Reassigns the cell's priority, fading the visible count toward the
    /// new tier's target instead of regenerating.
    ///
    /// A no-op when the tier is unchanged; an in-flight transition is
    /// restarted from the current visible count otherwise.
    pub fn retier(&mut self, tier: Tier, config: &FieldConfig) {
        if tier == self.tier {
            return;
        }
        self.tier = tier;
        self.transition_start_count = self.visible_count;
        self.target_count = target_count(self.base.len(), tier, config);
        self.transition_progress = 0.0;
        self.transitioning = true;
    }

    /// Advances an active transition by `dt` seconds at `speed` progress
    /// per second. Returns true when the transition completed this call.
    ///
    /// The visible count is the rounded interpolation between the start and
    /// target counts, which makes the fade frame-rate independent: only the
    /// accumulated progress matters, not how the ticks were sliced.
    pub fn advance_transition(&mut self, dt: f32, speed: f32) -> bool {
        if !self.transitioning {
            return false;
        }
        self.transition_progress = (self.transition_progress + dt * speed).min(1.0);
        self.visible_count = lerp(
            self.transition_start_count as f32,
            self.target_count as f32,
            self.transition_progress,
        )
        .round() as usize;

        if self.transition_progress >= 1.0 {
            self.visible_count = self.target_count;
            self.transitioning = false;
            true
        } else {
            false
        }
    }
}
