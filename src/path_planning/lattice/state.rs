//! Planning state: pose plus accumulated cost

use crate::common::{normalize_angle_positive, Pose2D};

/// A node of the planning lattice.
///
/// The heading is always kept in [0, 2π). Derived `PartialEq` compares the
/// raw fields exactly; planning-node identity goes through
/// [`Tolerances`](super::Tolerances).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub cost: f64,
}

impl State {
    /// Zero-cost state at the given pose
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self {
            x,
            y,
            heading: normalize_angle_positive(heading),
            cost: 0.0,
        }
    }

    pub fn from_pose(pose: &Pose2D) -> Self {
        Self::new(pose.x, pose.y, pose.yaw)
    }

    pub fn with_cost(self, cost: f64) -> Self {
        Self { cost, ..self }
    }

    pub fn pose(&self) -> Pose2D {
        Pose2D::new(self.x, self.y, self.heading)
    }
}

impl From<Pose2D> for State {
    fn from(pose: Pose2D) -> Self {
        Self::from_pose(&pose)
    }
}
