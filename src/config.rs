//! Configuration loading for lattice_planner
//!
//! The configuration is read once at startup. Key names follow the JSON
//! layout of the planner config files (`theta`, `dtheta`, `weight`,
//! `distance`), with the longer names accepted as well.

use std::f64::consts::FRAC_PI_2;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::common::{PlannerError, PlannerResult, Pose2D};
use crate::path_planning::lattice::{
    Circle, CirclesApproximation, DistanceMetric, Footprint, FootprintConfig, GoalRegionConfig, MotionPrimitive,
    PrimitiveLibrary, ToleranceConfig, Tolerances, DEFAULT_BOUNDING_BOX,
};

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub tolerances: ToleranceConfig,

    pub primitives: Vec<MotionPrimitive>,

    /// Vehicle pose used until a live pose is published
    #[serde(default)]
    pub initial: Pose2D,

    pub vehicle: FootprintConfig,

    #[serde(default)]
    pub goal_region: GoalRegionConfig,

    /// |x| and |y| beyond which every state counts as colliding
    #[serde(default = "default_bounding_box")]
    pub bounding_box: f64,

    #[serde(default)]
    pub distance_metric: DistanceMetric,

    /// How long the planning loop waits for a scene before re-checking shutdown
    #[serde(default = "default_period_ms")]
    pub period_ms: u64,

    /// Replace open states when a cheaper arrival is found
    #[serde(default = "default_improve_open_states")]
    pub improve_open_states: bool,
}

impl Default for PlannerConfig {
    /// Forward step plus quarter turns for a 0.5 m disc at the origin
    fn default() -> Self {
        Self {
            tolerances: ToleranceConfig::default(),
            primitives: vec![
                MotionPrimitive::forward(1.0, 1.0),
                MotionPrimitive::turn(FRAC_PI_2, 0.5),
                MotionPrimitive::turn(-FRAC_PI_2, 0.5),
            ],
            initial: Pose2D::origin(),
            vehicle: FootprintConfig {
                shape: None,
                circles_approximation: CirclesApproximation {
                    circles: vec![Circle::new(0.0, 0.0, 0.5)],
                },
            },
            goal_region: GoalRegionConfig::default(),
            bounding_box: default_bounding_box(),
            distance_metric: DistanceMetric::default(),
            period_ms: default_period_ms(),
            improve_open_states: default_improve_open_states(),
        }
    }
}

fn default_bounding_box() -> f64 {
    DEFAULT_BOUNDING_BOX
}

fn default_period_ms() -> u64 {
    100
}

fn default_improve_open_states() -> bool {
    true
}

/// Checked runtime values derived from a [`PlannerConfig`]
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub tolerances: Tolerances,
    pub primitives: PrimitiveLibrary,
    pub footprint: Footprint,
    pub initial: Pose2D,
    pub goal_region: GoalRegionConfig,
    pub bounding_box: f64,
    pub distance_metric: DistanceMetric,
    pub period: Duration,
    pub improve_open_states: bool,
}

impl PlannerConfig {
    pub fn from_json_str(json: &str) -> PlannerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PlannerResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check every section and build the runtime values
    pub fn validate(&self) -> PlannerResult<ValidatedConfig> {
        let tolerances = Tolerances::from_config(&self.tolerances)?;
        let primitives = PrimitiveLibrary::new(self.primitives.clone())?;
        let footprint = Footprint::from_config(&self.vehicle)?;
        self.goal_region.validate()?;

        if !(self.initial.x.is_finite() && self.initial.y.is_finite() && self.initial.yaw.is_finite()) {
            return Err(PlannerError::InvalidParameter("initial pose must be finite".to_string()));
        }
        if self.bounding_box.is_nan() || self.bounding_box <= 0.0 {
            return Err(PlannerError::InvalidParameter(format!(
                "bounding_box must be positive, got {}",
                self.bounding_box
            )));
        }
        if self.period_ms == 0 {
            return Err(PlannerError::InvalidParameter("period_ms must be positive".to_string()));
        }

        Ok(ValidatedConfig {
            tolerances,
            primitives,
            footprint,
            initial: self.initial,
            goal_region: self.goal_region,
            bounding_box: self.bounding_box,
            distance_metric: self.distance_metric,
            period: Duration::from_millis(self.period_ms),
            improve_open_states: self.improve_open_states,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    const SAMPLE: &str = r#"{
        "tolerances": {"x": 0.001, "y": 0.001, "theta": 0.05, "distance": 0.001},
        "primitives": [
            {"dx": 1.0, "dy": 0.0, "dtheta": 0.0, "weight": 1.0},
            {"dx": 0.0, "dy": 0.0, "dtheta": 1.5707963267948966, "weight": 0.5},
            {"dx": 0.0, "dy": 0.0, "dtheta": -1.5707963267948966, "weight": 0.5}
        ],
        "initial": {"x": 1.0, "y": 2.0, "theta": 0.0},
        "vehicle": {
            "shape": {"width": 1.0, "height": 1.0},
            "circles_approximation": {"circles": [
                {"center": {"x": 0.5, "y": 0.5}, "radius": 0.4}
            ]}
        },
        "distance_metric": "chamfer5"
    }"#;

    #[test]
    fn test_parse_sample_config() {
        let config = PlannerConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.primitives.len(), 3);
        assert_eq!(config.initial, Pose2D::new(1.0, 2.0, 0.0));
        assert_eq!(config.distance_metric, DistanceMetric::Chamfer5);
        assert_eq!(config.bounding_box, DEFAULT_BOUNDING_BOX);
        assert_eq!(config.period_ms, 100);
        assert!(config.improve_open_states);

        let validated = config.validate().unwrap();
        assert_relative_eq!(validated.tolerances.x(), 0.001);
        let turns: Vec<f64> = validated.primitives.iter().map(|p| p.dheading).collect();
        assert_relative_eq!(turns[2], 1.5 * PI);
        let centre = validated.footprint.circles()[0].center;
        assert_eq!((centre.x, centre.y), (0.0, 0.0));
        assert_eq!(validated.period, Duration::from_millis(100));
    }

    #[test]
    fn test_default_config_is_valid() {
        let validated = PlannerConfig::default().validate().unwrap();
        assert_eq!(validated.primitives.len(), 3);
        assert_eq!(validated.footprint.circles().len(), 1);
        assert_eq!(validated.initial, Pose2D::origin());
    }

    #[test]
    fn test_empty_primitives_rejected() {
        let json = SAMPLE.replace(
            r#""primitives": ["#,
            r#""unused": ["#,
        );
        // missing primitives is a parse error
        assert!(matches!(PlannerConfig::from_json_str(&json), Err(PlannerError::Json(_))));

        let mut config = PlannerConfig::from_json_str(SAMPLE).unwrap();
        config.primitives.clear();
        assert!(matches!(config.validate(), Err(PlannerError::EmptyPrimitiveLibrary)));
    }

    #[test]
    fn test_malformed_footprint_rejected() {
        let mut config = PlannerConfig::from_json_str(SAMPLE).unwrap();
        config.vehicle.circles_approximation.circles.clear();
        assert!(matches!(config.validate(), Err(PlannerError::InvalidFootprint(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PlannerConfig::from_json_file("/nonexistent/planner.json").unwrap_err();
        assert!(matches!(err, PlannerError::Io(_)));
    }
}
