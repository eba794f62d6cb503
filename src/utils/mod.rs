//! Utility modules for lattice_planner

pub mod grid_map;
pub mod visualization;

pub use grid_map::*;
pub use visualization::{Visualizer, PathStyle, PointStyle, colors};
