//! Vehicle footprint as a union of circles

use nalgebra::Point2;
use serde::Deserialize;

use crate::common::{Point2D, PlannerError, PlannerResult};

use super::state::State;

/// Circle in the vehicle frame
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Circle {
    pub center: Point2D,
    pub radius: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { center: Point2D::new(x, y), radius }
    }
}

/// Rectangular body outline; circle centres are given from its corner
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ShapeConfig {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CirclesApproximation {
    pub circles: Vec<Circle>,
}

/// Footprint section of the planner configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FootprintConfig {
    #[serde(default)]
    pub shape: Option<ShapeConfig>,
    #[serde(default)]
    pub circles_approximation: CirclesApproximation,
}

/// Rigid vehicle footprint, validated once and shared read-only
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    circles: Vec<Circle>,
}

impl Footprint {
    pub fn new(circles: Vec<Circle>) -> PlannerResult<Self> {
        if circles.is_empty() {
            return Err(PlannerError::InvalidFootprint(
                "footprint needs at least one circle".to_string(),
            ));
        }
        for (i, c) in circles.iter().enumerate() {
            if !(c.center.x.is_finite() && c.center.y.is_finite()) {
                return Err(PlannerError::InvalidFootprint(format!(
                    "circle #{} has a non-finite center",
                    i
                )));
            }
            if !c.radius.is_finite() || c.radius <= 0.0 {
                return Err(PlannerError::InvalidFootprint(format!(
                    "circle #{} has radius {}",
                    i, c.radius
                )));
            }
        }
        Ok(Self { circles })
    }

    /// Single disc centred on the vehicle origin
    pub fn disc(radius: f64) -> PlannerResult<Self> {
        Self::new(vec![Circle::new(0.0, 0.0, radius)])
    }

    /// Build from configuration, shifting corner-relative centres when a shape is given.
    pub fn from_config(config: &FootprintConfig) -> PlannerResult<Self> {
        let (ox, oy) = match config.shape {
            Some(shape) => {
                if !(shape.width > 0.0 && shape.height > 0.0) {
                    return Err(PlannerError::InvalidFootprint(format!(
                        "shape must have positive size, got {}x{}",
                        shape.width, shape.height
                    )));
                }
                (-shape.width / 2.0, -shape.height / 2.0)
            }
            None => (0.0, 0.0),
        };
        let circles = config
            .circles_approximation
            .circles
            .iter()
            .map(|c| Circle::new(c.center.x + ox, c.center.y + oy, c.radius))
            .collect();
        Self::new(circles)
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    /// Largest distance from the vehicle origin covered by any circle
    pub fn bounding_radius(&self) -> f64 {
        self.circles
            .iter()
            .map(|c| c.center.x.hypot(c.center.y) + c.radius)
            .fold(0.0, f64::max)
    }

    /// Circle centres in the world frame together with their radii
    pub fn placed_at<'a>(&'a self, state: &State) -> impl Iterator<Item = (Point2<f64>, f64)> + 'a {
        let iso = state.pose().to_isometry();
        self.circles
            .iter()
            .map(move |c| (iso * c.center.to_point(), c.radius))
    }
}
