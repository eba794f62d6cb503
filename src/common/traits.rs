//! Traits at the seams of the search engine

use crate::path_planning::lattice::State;

/// Oracle answering whether the vehicle placed at a state hits anything
pub trait CollisionChecker {
    /// Returns true if the state is in collision (or otherwise unusable)
    fn collides(&self, state: &State) -> bool;
}

/// Termination condition for the search
pub trait GoalPredicate {
    /// Returns true if the state satisfies the goal
    fn contains(&self, state: &State) -> bool;
}

impl<F> GoalPredicate for F
where
    F: Fn(&State) -> bool,
{
    fn contains(&self, state: &State) -> bool {
        self(state)
    }
}

/// Collision checker for unobstructed space
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeSpace;

impl CollisionChecker for FreeSpace {
    fn collides(&self, _state: &State) -> bool {
        false
    }
}
