//! Collision field: distance transform of a scene plus footprint queries
//!
//! Built once per scene snapshot and then queried read-only by the search.
//! Anything the field cannot vouch for (outside the grid, beyond the
//! bounding box) counts as a collision.

use std::sync::Arc;

use log::trace;
use nalgebra::Point2;

use crate::common::{CollisionChecker, PlannerError, PlannerResult};
use crate::utils::OccupancyGrid;

use super::distance_transform::{distance_transform, DistanceMetric};
use super::footprint::Footprint;
use super::state::State;

/// Default |x|, |y| sanity limit for states under test
pub const DEFAULT_BOUNDING_BOX: f64 = 20.0;

#[derive(Debug, Clone)]
pub struct CollisionField {
    grid: Arc<OccupancyGrid>,
    distances: Vec<f64>,
    footprint: Arc<Footprint>,
    bounding_box: f64,
}

impl CollisionField {
    pub fn build(
        grid: Arc<OccupancyGrid>,
        footprint: Arc<Footprint>,
        metric: DistanceMetric,
        bounding_box: f64,
    ) -> PlannerResult<Self> {
        grid.validate()?;
        if bounding_box.is_nan() || bounding_box <= 0.0 {
            return Err(PlannerError::InvalidParameter(format!(
                "bounding box must be positive, got {}",
                bounding_box
            )));
        }
        let distances = distance_transform(&grid, metric);
        trace!(
            "collision field built: {}x{} cells, metric {:?}",
            grid.width(),
            grid.height(),
            metric
        );
        Ok(Self { grid, distances, footprint, bounding_box })
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    /// Distance values in row-major cell order
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Obstacle distance at the cell containing a world point
    pub fn distance_at(&self, point: &Point2<f64>) -> Option<f64> {
        self.grid
            .world_to_cell(point)
            .map(|(i, j)| self.distances[self.grid.index(i, j)])
    }

    /// Returns true if the footprint placed at `state` hits an obstacle,
    /// leaves the grid, or the state is beyond the bounding box.
    pub fn test(&self, state: &State) -> bool {
        if state.x.abs() > self.bounding_box || state.y.abs() > self.bounding_box {
            return true;
        }
        if !(state.x.is_finite() && state.y.is_finite()) {
            return true;
        }
        self.footprint
            .placed_at(state)
            .any(|(centre, radius)| match self.distance_at(&centre) {
                Some(distance) => distance < radius,
                None => true,
            })
    }
}

impl CollisionChecker for CollisionField {
    fn collides(&self, state: &State) -> bool {
        self.test(state)
    }
}
