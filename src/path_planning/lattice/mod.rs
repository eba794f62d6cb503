//! Motion primitive lattice planner
//!
//! Plans over (x, y, heading) states reached by applying a fixed library of
//! motion primitives, checking every state against a collision field
//! derived from the current occupancy grid.
//!
//! # Components
//!
//! - `tolerance`: quantised identity, ordering and hashing of states
//! - `state`, `motion_primitive`: the lattice itself
//! - `footprint`, `distance_transform`, `collision`: the collision oracle
//! - `goal`: goal region predicate
//! - `search`, `reconstruct`: uniform-cost search and back-pointer walk
//! - `planner`: ties one request together
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use lattice_planner::config::PlannerConfig;
//! use lattice_planner::path_planning::lattice::LatticePlanner;
//! use lattice_planner::utils::OccupancyGrid;
//! use lattice_planner::Pose2D;
//!
//! let config = PlannerConfig::from_json_file("config/planner.json").unwrap();
//! let planner = LatticePlanner::from_config(&config).unwrap();
//! let grid = OccupancyGrid::empty(10, 10, 1.0, Pose2D::origin()).unwrap();
//! let result = planner
//!     .plan(Arc::new(grid), Pose2D::origin(), Pose2D::new(5.0, 5.0, 0.0))
//!     .unwrap();
//! println!("found: {}", result.is_found());
//! ```

pub mod collision;
pub mod distance_transform;
pub mod footprint;
pub mod goal;
pub mod motion_primitive;
pub mod planner;
pub mod reconstruct;
pub mod search;
pub mod state;
pub mod tolerance;

pub use collision::{CollisionField, DEFAULT_BOUNDING_BOX};
pub use distance_transform::{distance_transform, DistanceMetric};
pub use footprint::{Circle, CirclesApproximation, Footprint, FootprintConfig, ShapeConfig};
pub use goal::{GoalRegion, GoalRegionConfig};
pub use motion_primitive::{MotionPrimitive, PrimitiveLibrary};
pub use planner::{LatticePlanner, PlannedPath};
pub use reconstruct::reconstruct_path;
pub use search::{SearchEngine, SearchOutcome, SearchResult, SearchStats};
pub use state::State;
pub use tolerance::{FrontierKey, StateKey, ToleranceConfig, Tolerances};
