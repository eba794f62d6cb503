//! lattice_planner - kinodynamic motion-primitive lattice planner
//!
//! This crate plans collision-free paths for a vehicle whose motion is
//! restricted to a fixed library of motion primitives, over an occupancy
//! grid scene.

// Core modules
pub mod common;
pub mod config;
pub mod utils;

// Planning modules
pub mod path_planning;
pub mod scheduler;

// Re-export common types for convenience
pub use common::{Point2D, Pose2D, Limits};
pub use common::{CollisionChecker, GoalPredicate};
pub use common::{PlannerError, PlannerResult};
pub use config::{PlannerConfig, ValidatedConfig};
pub use path_planning::lattice::{LatticePlanner, PlannedPath, SearchOutcome, State};
pub use scheduler::{PlannerInputs, PlanningLoop, PlanningLoopHandle};
pub use utils::OccupancyGrid;
