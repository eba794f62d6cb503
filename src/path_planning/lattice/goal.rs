//! Goal region: a box around a base pose
//!
//! The x/y ranges are measured in the base pose's frame, the heading range
//! as the wrapped difference from the base heading, and the cost range on
//! the accumulated cost.

use std::f64::consts::PI;

use nalgebra::Point2;
use serde::Deserialize;

use crate::common::{angle_diff, GoalPredicate, Limits, PlannerError, PlannerResult, Pose2D};

use super::state::State;

/// Half-widths of the region built around each published goal point
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GoalRegionConfig {
    pub x: f64,
    pub y: f64,
    #[serde(alias = "theta")]
    pub heading: f64,
    /// Upper bound on accumulated cost, unbounded when absent
    pub max_cost: Option<f64>,
}

impl Default for GoalRegionConfig {
    fn default() -> Self {
        Self {
            x: 0.5,
            y: 0.5,
            heading: PI,
            max_cost: None,
        }
    }
}

impl GoalRegionConfig {
    pub fn validate(&self) -> PlannerResult<()> {
        for (name, v) in [("x", self.x), ("y", self.y), ("heading", self.heading)] {
            if v.is_nan() || v < 0.0 {
                return Err(PlannerError::InvalidParameter(format!(
                    "goal half-width {} must be non-negative, got {}",
                    name, v
                )));
            }
        }
        if let Some(max_cost) = self.max_cost {
            if max_cost.is_nan() || max_cost < 0.0 {
                return Err(PlannerError::InvalidParameter(format!(
                    "goal max_cost must be non-negative, got {}",
                    max_cost
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalRegion {
    pub base: Pose2D,
    pub x_range: Limits,
    pub y_range: Limits,
    pub heading_range: Limits,
    pub cost_range: Limits,
}

impl GoalRegion {
    pub fn new(
        base: Pose2D,
        x_range: Limits,
        y_range: Limits,
        heading_range: Limits,
        cost_range: Limits,
    ) -> Self {
        Self { base, x_range, y_range, heading_range, cost_range }
    }

    /// Symmetric region centred on a goal point
    pub fn around(goal: Pose2D, config: &GoalRegionConfig) -> Self {
        Self {
            base: goal,
            x_range: Limits::symmetric(config.x),
            y_range: Limits::symmetric(config.y),
            heading_range: Limits::symmetric(config.heading),
            cost_range: Limits::new(0.0, config.max_cost.unwrap_or(f64::INFINITY)),
        }
    }

    pub fn contains(&self, state: &State) -> bool {
        let local = self
            .base
            .to_isometry()
            .inverse_transform_point(&Point2::new(state.x, state.y));
        self.x_range.is_met(local.x)
            && self.y_range.is_met(local.y)
            && self.heading_range.is_met(angle_diff(state.heading, self.base.yaw))
            && self.cost_range.is_met(state.cost)
    }
}

impl GoalPredicate for GoalRegion {
    fn contains(&self, state: &State) -> bool {
        GoalRegion::contains(self, state)
    }
}
