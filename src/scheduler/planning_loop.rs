//! Planning loop: one worker thread planning against the newest inputs
//!
//! The worker:
//! - Blocks until a new scene snapshot is published (or the period elapses)
//! - Skips the cycle when no goal has been published yet
//! - Builds the collision field and searches from the latest vehicle pose
//! - Sends the resulting [`PlannedPath`] (possibly empty) on the output channel
//!
//! Scene, goal and pose arrive through [`LatestSlot`]s, so producers never
//! wait on a running search and the worker never works through a backlog.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Sender;
use log::{debug, error, info, warn};

use crate::common::{PlannerResult, Pose2D};
use crate::config::ValidatedConfig;
use crate::path_planning::lattice::{LatticePlanner, PlannedPath};
use crate::utils::OccupancyGrid;

use super::slot::{LatestSlot, SlotWait};

/// Producer side of the planning loop
#[derive(Debug, Clone)]
pub struct PlannerInputs {
    scene: Arc<LatestSlot<Arc<OccupancyGrid>>>,
    goal: Arc<LatestSlot<Pose2D>>,
    pose: Arc<LatestSlot<Pose2D>>,
}

impl PlannerInputs {
    /// Empty scene and goal slots, vehicle pose preset to `initial`
    pub fn new(initial: Pose2D) -> Self {
        Self {
            scene: Arc::new(LatestSlot::new()),
            goal: Arc::new(LatestSlot::new()),
            pose: Arc::new(LatestSlot::with_value(initial)),
        }
    }

    /// Replace the pending scene. Returns false once the loop is shut down.
    pub fn publish_scene(&self, scene: impl Into<Arc<OccupancyGrid>>) -> bool {
        self.scene.publish(scene.into())
    }

    pub fn publish_goal(&self, goal: Pose2D) -> bool {
        self.goal.publish(goal)
    }

    /// Vehicle pose the next search starts from
    pub fn publish_pose(&self, pose: Pose2D) -> bool {
        self.pose.publish(pose)
    }

    pub fn goal(&self) -> Option<Pose2D> {
        self.goal.peek()
    }

    pub fn pose(&self) -> Option<Pose2D> {
        self.pose.peek()
    }

    pub fn close(&self) {
        self.scene.close();
        self.goal.close();
        self.pose.close();
    }

    pub fn is_closed(&self) -> bool {
        self.scene.is_closed()
    }
}

/// What a single cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A path with this sequence number was sent
    Published(u64),
    /// No scene arrived within the period
    NoScene,
    /// Scene consumed, but no goal has been published yet
    NoGoal,
    /// Scene could not be turned into a collision field
    SceneRejected,
    /// Output receiver is gone
    Disconnected,
    /// Inputs were closed
    Closed,
}

pub struct PlanningLoop {
    planner: LatticePlanner,
    inputs: PlannerInputs,
    output: Sender<PlannedPath>,
    period: Duration,
    initial: Pose2D,
    sequence: u64,
}

impl PlanningLoop {
    pub fn new(config: &ValidatedConfig, output: Sender<PlannedPath>) -> Self {
        Self {
            planner: LatticePlanner::new(config),
            inputs: PlannerInputs::new(config.initial),
            output,
            period: config.period,
            initial: config.initial,
            sequence: 0,
        }
    }

    /// Handle for publishing scenes, goals and poses
    pub fn inputs(&self) -> PlannerInputs {
        self.inputs.clone()
    }

    pub fn planner(&self) -> &LatticePlanner {
        &self.planner
    }

    /// Wait up to one period for a scene and plan against it
    pub fn poll(&mut self) -> CycleOutcome {
        match self.inputs.scene.take_timeout(self.period) {
            SlotWait::Value(scene) => self.run_cycle(scene),
            SlotWait::TimedOut => CycleOutcome::NoScene,
            SlotWait::Closed => CycleOutcome::Closed,
        }
    }

    /// Plan once against `scene` with the current goal and pose
    pub fn run_cycle(&mut self, scene: Arc<OccupancyGrid>) -> CycleOutcome {
        let goal = match self.inputs.goal.peek() {
            Some(goal) => goal,
            None => {
                debug!("No goal published, skipping cycle");
                return CycleOutcome::NoGoal;
            }
        };
        let initial = self.inputs.pose.peek().unwrap_or(self.initial);

        let field = match self.planner.build_field(scene) {
            Ok(field) => field,
            Err(e) => {
                error!("Rejected scene: {}", e);
                return CycleOutcome::SceneRejected;
            }
        };

        let result = self
            .planner
            .search(&field, initial, &self.planner.goal_region(goal));

        let sequence = self.sequence;
        self.sequence += 1;
        let path = PlannedPath::from_result(sequence, &result);

        if self.output.send(path).is_err() {
            return CycleOutcome::Disconnected;
        }
        CycleOutcome::Published(sequence)
    }

    /// Run cycles until the inputs are closed or the receiver is dropped
    pub fn run(mut self) {
        info!("Planning loop starting (period {:?})", self.period);
        loop {
            match self.poll() {
                CycleOutcome::Closed => {
                    info!("Planning loop shut down after {} paths", self.sequence);
                    break;
                }
                CycleOutcome::Disconnected => {
                    warn!("Path receiver disconnected, stopping planning loop");
                    break;
                }
                _ => {}
            }
        }
        self.inputs.close();
    }

    /// Move the loop onto its own named thread
    pub fn spawn(self) -> PlannerResult<PlanningLoopHandle> {
        let inputs = self.inputs();
        let handle = thread::Builder::new()
            .name("planner".into())
            .spawn(move || self.run())?;

        Ok(PlanningLoopHandle { inputs, handle })
    }
}

/// Running planning loop
pub struct PlanningLoopHandle {
    inputs: PlannerInputs,
    handle: JoinHandle<()>,
}

impl PlanningLoopHandle {
    pub fn inputs(&self) -> &PlannerInputs {
        &self.inputs
    }

    /// Close the input slots; the worker exits after its current cycle
    pub fn shutdown(&self) {
        self.inputs.close();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for thread to finish
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::path_planning::lattice::SearchOutcome;
    use crossbeam_channel::unbounded;

    const CONFIG: &str = r#"{
        "primitives": [
            {"dx": 1.0, "dy": 0.0, "dtheta": 0.0, "weight": 1.0},
            {"dx": 0.0, "dy": 0.0, "dtheta": 1.5707963267948966, "weight": 0.5},
            {"dx": 0.0, "dy": 0.0, "dtheta": -1.5707963267948966, "weight": 0.5}
        ],
        "initial": {"x": 0.5, "y": 0.5, "theta": 0.0},
        "vehicle": {"circles_approximation": {"circles": [
            {"center": {"x": 0.0, "y": 0.0}, "radius": 0.3}
        ]}},
        "period_ms": 10
    }"#;

    fn config() -> ValidatedConfig {
        PlannerConfig::from_json_str(CONFIG).unwrap().validate().unwrap()
    }

    fn open_scene() -> Arc<OccupancyGrid> {
        Arc::new(OccupancyGrid::empty(5, 5, 1.0, Pose2D::origin()).unwrap())
    }

    #[test]
    fn test_cycle_without_goal_is_skipped() {
        let (tx, rx) = unbounded();
        let mut planning = PlanningLoop::new(&config(), tx);
        assert_eq!(planning.run_cycle(open_scene()), CycleOutcome::NoGoal);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_poll_without_scene_is_noop() {
        let (tx, rx) = unbounded();
        let mut planning = PlanningLoop::new(&config(), tx);
        planning.inputs().publish_goal(Pose2D::new(2.5, 0.5, 0.0));
        assert_eq!(planning.poll(), CycleOutcome::NoScene);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_cycle_publishes_path_with_increasing_sequence() {
        let (tx, rx) = unbounded();
        let mut planning = PlanningLoop::new(&config(), tx);
        let inputs = planning.inputs();
        inputs.publish_goal(Pose2D::new(2.5, 0.5, 0.0));

        inputs.publish_scene(open_scene());
        assert_eq!(planning.poll(), CycleOutcome::Published(0));
        inputs.publish_scene(open_scene());
        assert_eq!(planning.poll(), CycleOutcome::Published(1));

        let first = rx.recv().unwrap();
        let second = rx.recv().unwrap();
        assert_eq!(first.sequence, 0);
        assert_eq!(second.sequence, 1);
        assert_eq!(first.outcome, SearchOutcome::Found);
        assert_eq!(first.poses.len(), 3);
        assert!(second.created_at >= first.created_at);
    }

    #[test]
    fn test_latest_goal_wins() {
        let (tx, rx) = unbounded();
        let mut planning = PlanningLoop::new(&config(), tx);
        let inputs = planning.inputs();
        inputs.publish_goal(Pose2D::new(4.5, 0.5, 0.0));
        inputs.publish_goal(Pose2D::new(1.5, 0.5, 0.0));
        inputs.publish_scene(open_scene());
        inputs.publish_scene(open_scene());

        assert_eq!(planning.poll(), CycleOutcome::Published(0));
        // both scenes collapsed into one
        assert_eq!(planning.poll(), CycleOutcome::NoScene);

        let path = rx.recv().unwrap();
        let last = path.poses.last().unwrap();
        assert!((last.x - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_published_pose_seeds_search() {
        let (tx, rx) = unbounded();
        let mut planning = PlanningLoop::new(&config(), tx);
        let inputs = planning.inputs();
        inputs.publish_pose(Pose2D::new(3.5, 0.5, 0.0));
        inputs.publish_goal(Pose2D::new(3.5, 0.5, 0.0));

        assert_eq!(planning.run_cycle(open_scene()), CycleOutcome::Published(0));
        let path = rx.recv().unwrap();
        assert_eq!(path.poses, vec![Pose2D::new(3.5, 0.5, 0.0)]);
        assert_eq!(path.cost, Some(0.0));
    }

    #[test]
    fn test_dropped_receiver_stops_loop() {
        let (tx, rx) = unbounded();
        let mut planning = PlanningLoop::new(&config(), tx);
        planning.inputs().publish_goal(Pose2D::new(2.5, 0.5, 0.0));
        drop(rx);
        assert_eq!(planning.run_cycle(open_scene()), CycleOutcome::Disconnected);
    }

    #[test]
    fn test_spawned_loop_plans_and_shuts_down() {
        let (tx, rx) = unbounded();
        let handle = PlanningLoop::new(&config(), tx).spawn().unwrap();
        handle.inputs().publish_goal(Pose2D::new(2.5, 0.5, 0.0));
        handle.inputs().publish_scene(open_scene());

        let path = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(path.outcome, SearchOutcome::Found);

        handle.shutdown();
        assert!(!handle.inputs().publish_scene(open_scene()));
        handle.join().unwrap();
    }
}
