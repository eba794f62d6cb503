//! Motion primitive library
//!
//! A primitive is a pose delta expressed in the vehicle frame plus the cost
//! of executing it. The library is fixed at planner construction and its
//! order is the expansion order of the search.

use nalgebra::{Rotation2, Vector2};
use serde::Deserialize;

use crate::common::{normalize_angle_positive, PlannerError, PlannerResult};

use super::state::State;

/// Pose delta in the vehicle's local (heading-relative) frame
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MotionPrimitive {
    pub dx: f64,
    pub dy: f64,
    #[serde(alias = "dtheta")]
    pub dheading: f64,
    #[serde(alias = "weight")]
    pub cost_weight: f64,
}

impl MotionPrimitive {
    pub fn new(dx: f64, dy: f64, dheading: f64, cost_weight: f64) -> Self {
        Self { dx, dy, dheading, cost_weight }
    }

    /// Straight move of `distance` along the current heading
    pub fn forward(distance: f64, cost_weight: f64) -> Self {
        Self::new(distance, 0.0, 0.0, cost_weight)
    }

    /// In-place rotation by `angle` (positive is counter-clockwise)
    pub fn turn(angle: f64, cost_weight: f64) -> Self {
        Self::new(0.0, 0.0, angle, cost_weight)
    }

    /// Successor of `state` after executing this primitive
    pub fn apply(&self, state: &State) -> State {
        let delta = Rotation2::new(state.heading) * Vector2::new(self.dx, self.dy);
        State {
            x: state.x + delta.x,
            y: state.y + delta.y,
            heading: normalize_angle_positive(state.heading + self.dheading),
            cost: state.cost + self.cost_weight,
        }
    }
}

/// Ordered, validated, non-empty set of primitives
#[derive(Debug, Clone)]
pub struct PrimitiveLibrary {
    primitives: Vec<MotionPrimitive>,
}

impl PrimitiveLibrary {
    pub fn new(primitives: Vec<MotionPrimitive>) -> PlannerResult<Self> {
        if primitives.is_empty() {
            return Err(PlannerError::EmptyPrimitiveLibrary);
        }

        let mut normalized = Vec::with_capacity(primitives.len());
        for (index, p) in primitives.into_iter().enumerate() {
            if !(p.dx.is_finite() && p.dy.is_finite() && p.dheading.is_finite()) {
                return Err(PlannerError::InvalidPrimitive {
                    index,
                    reason: "non-finite pose delta".to_string(),
                });
            }
            if !p.cost_weight.is_finite() || p.cost_weight < 0.0 {
                return Err(PlannerError::InvalidPrimitive {
                    index,
                    reason: format!("cost weight must be non-negative, got {}", p.cost_weight),
                });
            }
            normalized.push(MotionPrimitive {
                dheading: normalize_angle_positive(p.dheading),
                ..p
            });
        }

        Ok(Self { primitives: normalized })
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MotionPrimitive> {
        self.primitives.iter()
    }

    /// All successors of `state`, in library order
    pub fn successors<'a>(&'a self, state: &'a State) -> impl Iterator<Item = State> + 'a {
        self.primitives.iter().map(move |p| p.apply(state))
    }
}
