//! Derived geometry computed from flat datasets.
//!
//! Layouts are pure functions over caller-owned rows: they never retain the
//! input and return plain values that reference rows by index (or by
//! borrowing them, for bins and pie slices). The force simulation is the
//! exception in that it mutates the node slice it is given.

mod arc;
mod bin;
mod force;
mod pie;
mod stack;

pub use arc::{ArcGenerator, point_radial};
pub use bin::{Bin, Thresholds, bin, bin_values};
pub use force::{
    DEFAULT_VELOCITY_DECAY, Force, ForceNode, Placement, Simulation, SimulationConfig, StepStats,
    force_step,
};
pub use pie::{Pie, PieSlice, pie};
pub use stack::{StackOffset, StackOrder, StackedSeries, stack};
