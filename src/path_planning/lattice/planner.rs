//! Lattice planner: one planning request from scene to path

use std::sync::Arc;
use std::time::SystemTime;

use itertools::Itertools;
use log::{debug, info};

use crate::common::{PlannerResult, Pose2D};
use crate::config::{PlannerConfig, ValidatedConfig};
use crate::utils::OccupancyGrid;

use super::collision::CollisionField;
use super::distance_transform::DistanceMetric;
use super::footprint::Footprint;
use super::goal::{GoalRegion, GoalRegionConfig};
use super::motion_primitive::PrimitiveLibrary;
use super::search::{SearchEngine, SearchOutcome, SearchResult, SearchStats};
use super::state::State;
use super::tolerance::Tolerances;

/// Planner output handed to consumers
#[derive(Debug, Clone)]
pub struct PlannedPath {
    /// Position of this path in the output stream, starting at 0
    pub sequence: u64,
    pub created_at: SystemTime,
    pub outcome: SearchOutcome,
    /// Start-to-goal poses, empty when no path was found
    pub poses: Vec<Pose2D>,
    pub cost: Option<f64>,
    pub stats: SearchStats,
}

impl PlannedPath {
    pub fn from_result(sequence: u64, result: &SearchResult) -> Self {
        Self {
            sequence,
            created_at: SystemTime::now(),
            outcome: result.outcome,
            poses: result.path.iter().map(State::pose).collect(),
            cost: result.cost(),
            stats: result.stats,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Euclidean length of the polyline through the poses
    pub fn length(&self) -> f64 {
        self.poses
            .iter()
            .tuple_windows()
            .map(|(a, b)| a.position().distance(&b.position()))
            .sum()
    }
}

/// Owns the validated, read-only planning configuration
#[derive(Debug, Clone)]
pub struct LatticePlanner {
    tolerances: Tolerances,
    primitives: PrimitiveLibrary,
    footprint: Arc<Footprint>,
    goal_region: GoalRegionConfig,
    metric: DistanceMetric,
    bounding_box: f64,
    improve_open_states: bool,
}

impl LatticePlanner {
    pub fn new(config: &ValidatedConfig) -> Self {
        Self {
            tolerances: config.tolerances,
            primitives: config.primitives.clone(),
            footprint: Arc::new(config.footprint.clone()),
            goal_region: config.goal_region,
            metric: config.distance_metric,
            bounding_box: config.bounding_box,
            improve_open_states: config.improve_open_states,
        }
    }

    pub fn from_config(config: &PlannerConfig) -> PlannerResult<Self> {
        Ok(Self::new(&config.validate()?))
    }

    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    pub fn primitives(&self) -> &PrimitiveLibrary {
        &self.primitives
    }

    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    /// Collision field for a scene, using this planner's footprint and metric
    pub fn build_field(&self, grid: Arc<OccupancyGrid>) -> PlannerResult<CollisionField> {
        CollisionField::build(grid, self.footprint.clone(), self.metric, self.bounding_box)
    }

    /// Goal region centred on a published goal point
    pub fn goal_region(&self, goal: Pose2D) -> GoalRegion {
        GoalRegion::around(goal, &self.goal_region)
    }

    pub fn search(&self, field: &CollisionField, initial: Pose2D, goal: &GoalRegion) -> SearchResult {
        let engine = SearchEngine::new(&self.tolerances, &self.primitives)
            .with_open_state_improvement(self.improve_open_states);
        let result = engine.search(State::from_pose(&initial), field, goal);

        match result.outcome {
            SearchOutcome::Found => info!(
                "path found: {} poses, cost {:.3}, {} expansions",
                result.path.len(),
                result.cost().unwrap_or_default(),
                result.stats.expanded
            ),
            SearchOutcome::NotFound => info!(
                "no path found after {} expansions",
                result.stats.expanded
            ),
        }
        debug!("search stats: {:?}", result.stats);
        result
    }

    /// Build the collision field and search in one call
    pub fn plan(
        &self,
        grid: Arc<OccupancyGrid>,
        initial: Pose2D,
        goal: Pose2D,
    ) -> PlannerResult<SearchResult> {
        let field = self.build_field(grid)?;
        Ok(self.search(&field, initial, &self.goal_region(goal)))
    }
}
