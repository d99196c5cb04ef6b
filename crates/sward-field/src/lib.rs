//! Camera-driven foliage cell lifecycle.
//!
//! The field keeps a working set of terrain cells resident around a single
//! camera: cells are classified by proximity and view direction into
//! priority tiers, generated deterministically on demand under a per-tick
//! admission budget, density-faded when their tier changes, and evicted the
//! moment they leave the retention region.
//!
//! Everything mutates on the single per-tick update path; within one tick,
//! classification precedes admission draining, which precedes transition
//! advancement, so later stages always observe the state earlier stages
//! produced.

mod arena;
mod cell;
mod classify;
mod config;
mod field;
mod pending;

pub use arena::CellArena;
pub use cell::{FoliageCell, Tier, target_count};
pub use classify::{CameraPose, sweep_radius, within_retention};
pub use config::FieldConfig;
pub use field::{FieldStats, FoliageField, TickReport};
pub use pending::PendingQueue;
