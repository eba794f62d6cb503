//! Planning loop and the latest-value slots feeding it

pub mod planning_loop;
pub mod slot;

pub use planning_loop::{CycleOutcome, PlannerInputs, PlanningLoop, PlanningLoopHandle};
pub use slot::{LatestSlot, SlotWait};
