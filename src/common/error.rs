//! Error types for lattice_planner
//!
//! Only configuration-time problems are errors. Planning outcomes
//! (found / not found) and missing inputs are reported as values.

use thiserror::Error;

/// Main error type for planner construction and configuration
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Occupancy grid with unusable dimensions or cell data
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// Motion primitive library without any primitives
    #[error("Motion primitive library is empty")]
    EmptyPrimitiveLibrary,

    /// Primitive with a negative or non-finite component
    #[error("Invalid motion primitive #{index}: {reason}")]
    InvalidPrimitive { index: usize, reason: String },

    /// Vehicle footprint that cannot be collision-checked
    #[error("Invalid footprint: {0}")]
    InvalidFootprint(String),

    /// Comparison tolerance that is not a positive finite number
    #[error("Invalid tolerance for {field}: {value}")]
    InvalidTolerance { field: &'static str, value: f64 },

    /// Any other out-of-range parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
