//! Uniform-cost search over the motion primitive lattice
//!
//! The frontier is ordered by (cost, x, y, heading) under the tolerance
//! model, so ties are broken deterministically and repeated searches over
//! the same inputs return the same path. All bookkeeping lives in a single
//! map from node key to its current state, parent and open/closed flag;
//! nothing survives the call.

use std::collections::{BTreeSet, HashMap};

use log::{debug, warn};

use crate::common::{CollisionChecker, GoalPredicate};

use super::motion_primitive::PrimitiveLibrary;
use super::reconstruct::reconstruct_path;
use super::state::State;
use super::tolerance::{FrontierKey, StateKey, Tolerances};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Found,
    NotFound,
}

/// Counters collected during one search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// States popped from the frontier and expanded
    pub expanded: usize,
    /// Successors produced by primitive application
    pub generated: usize,
    pub rejected_collision: usize,
    pub rejected_duplicate: usize,
    /// Open states whose cost and back-pointer were replaced by a cheaper arrival
    pub improved: usize,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub outcome: SearchOutcome,
    /// Start-to-goal states; empty unless `outcome` is `Found`
    pub path: Vec<State>,
    pub stats: SearchStats,
}

impl SearchResult {
    fn not_found(stats: SearchStats) -> Self {
        Self { outcome: SearchOutcome::NotFound, path: Vec::new(), stats }
    }

    pub fn is_found(&self) -> bool {
        self.outcome == SearchOutcome::Found
    }

    /// Accumulated cost at the goal, if a path was found
    pub fn cost(&self) -> Option<f64> {
        self.path.last().map(|s| s.cost)
    }
}

#[derive(Debug, Clone, Copy)]
struct Discovered {
    state: State,
    parent: Option<State>,
    closed: bool,
}

/// Search engine borrowing the planner's read-only configuration
#[derive(Debug, Clone, Copy)]
pub struct SearchEngine<'a> {
    tolerances: &'a Tolerances,
    primitives: &'a PrimitiveLibrary,
    improve_open_states: bool,
}

impl<'a> SearchEngine<'a> {
    pub fn new(tolerances: &'a Tolerances, primitives: &'a PrimitiveLibrary) -> Self {
        Self { tolerances, primitives, improve_open_states: true }
    }

    /// Whether a cheaper arrival at an open state replaces it. When
    /// disabled, any successor already on the frontier is skipped.
    pub fn with_open_state_improvement(mut self, enabled: bool) -> Self {
        self.improve_open_states = enabled;
        self
    }

    pub fn search<C, G>(&self, initial: State, checker: &C, goal: &G) -> SearchResult
    where
        C: CollisionChecker + ?Sized,
        G: GoalPredicate + ?Sized,
    {
        let tol = self.tolerances;
        let mut stats = SearchStats::default();

        if checker.collides(&initial) {
            warn!(
                "initial state ({:.3}, {:.3}, {:.3}) is in collision",
                initial.x, initial.y, initial.heading
            );
            return SearchResult::not_found(stats);
        }

        let mut open: BTreeSet<FrontierKey> = BTreeSet::new();
        let mut discovered: HashMap<StateKey, Discovered> = HashMap::new();

        open.insert(tol.frontier_key(&initial));
        discovered.insert(
            tol.key(&initial),
            Discovered { state: initial, parent: None, closed: false },
        );

        while let Some(top) = open.pop_first() {
            let current = match discovered.get_mut(&top.node) {
                Some(entry) => {
                    entry.closed = true;
                    entry.state
                }
                None => continue,
            };

            if goal.contains(&current) {
                debug!("goal reached: {:?}", stats);
                let path = reconstruct_path(current, initial, tol, |s| {
                    discovered.get(&tol.key(s)).and_then(|d| d.parent)
                });
                return match path {
                    Some(path) => SearchResult { outcome: SearchOutcome::Found, path, stats },
                    None => SearchResult::not_found(stats),
                };
            }

            stats.expanded += 1;
            for next in self.primitives.successors(&current) {
                stats.generated += 1;
                let key = tol.key(&next);

                if let Some(existing) = discovered.get(&key) {
                    let cheaper = !existing.closed
                        && self.improve_open_states
                        && tol.frontier_key(&next).cost < tol.frontier_key(&existing.state).cost;
                    if !cheaper {
                        stats.rejected_duplicate += 1;
                        continue;
                    }
                    if checker.collides(&next) {
                        stats.rejected_collision += 1;
                        continue;
                    }
                    open.remove(&tol.frontier_key(&existing.state));
                    open.insert(tol.frontier_key(&next));
                    discovered.insert(
                        key,
                        Discovered { state: next, parent: Some(current), closed: false },
                    );
                    stats.improved += 1;
                    continue;
                }

                if checker.collides(&next) {
                    stats.rejected_collision += 1;
                    continue;
                }

                open.insert(tol.frontier_key(&next));
                discovered.insert(
                    key,
                    Discovered { state: next, parent: Some(current), closed: false },
                );
            }
        }

        debug!("frontier exhausted: {:?}", stats);
        SearchResult::not_found(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::FreeSpace;
    use crate::path_planning::lattice::MotionPrimitive;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn grid_moves() -> PrimitiveLibrary {
        PrimitiveLibrary::new(vec![
            MotionPrimitive::forward(1.0, 1.0),
            MotionPrimitive::turn(PI / 2.0, 0.5),
            MotionPrimitive::turn(-PI / 2.0, 0.5),
        ])
        .unwrap()
    }

    /// Rejects anything outside the square [0, size]^2
    struct Square(f64);

    impl CollisionChecker for Square {
        fn collides(&self, s: &State) -> bool {
            s.x < -0.5 || s.y < -0.5 || s.x > self.0 + 0.5 || s.y > self.0 + 0.5
        }
    }

    #[test]
    fn test_straight_line() {
        let tol = Tolerances::default();
        let lib = grid_moves();
        let engine = SearchEngine::new(&tol, &lib);
        let goal = |s: &State| (s.x - 3.0).abs() < 0.1 && s.y.abs() < 0.1;
        let result = engine.search(State::new(0.0, 0.0, 0.0), &Square(5.0), &goal);

        assert!(result.is_found());
        assert_eq!(result.path.len(), 4);
        assert_relative_eq!(result.cost().unwrap(), 3.0);
        assert!(result.stats.expanded > 0);
    }

    #[test]
    fn test_goal_at_start() {
        let tol = Tolerances::default();
        let lib = grid_moves();
        let engine = SearchEngine::new(&tol, &lib);
        let start = State::new(1.0, 1.0, 0.0);
        let result = engine.search(start, &FreeSpace, &|s: &State| tol.same_node(s, &start));

        assert!(result.is_found());
        assert_eq!(result.path, vec![start]);
        assert_eq!(result.cost(), Some(0.0));
        assert_eq!(result.stats.expanded, 0);
    }

    #[test]
    fn test_unreachable_goal_exhausts_frontier() {
        let tol = Tolerances::default();
        let lib = grid_moves();
        let engine = SearchEngine::new(&tol, &lib);
        let goal = |s: &State| s.x > 10.0;
        let result = engine.search(State::new(0.0, 0.0, 0.0), &Square(3.0), &goal);

        assert_eq!(result.outcome, SearchOutcome::NotFound);
        assert!(result.path.is_empty());
        assert!(result.cost().is_none());
        // 16 cells times 4 headings, every one expanded exactly once
        assert_eq!(result.stats.expanded, 64);
    }

    #[test]
    fn test_colliding_start_is_not_found() {
        let tol = Tolerances::default();
        let lib = grid_moves();
        let engine = SearchEngine::new(&tol, &lib);
        let result = engine.search(State::new(-5.0, 0.0, 0.0), &Square(3.0), &|_: &State| true);
        assert_eq!(result.outcome, SearchOutcome::NotFound);
        assert_eq!(result.stats.expanded, 0);
    }

    #[test]
    fn test_repeated_search_is_deterministic() {
        let tol = Tolerances::default();
        let lib = grid_moves();
        let engine = SearchEngine::new(&tol, &lib);
        let goal = |s: &State| (s.x - 3.0).abs() < 0.1 && (s.y - 2.0).abs() < 0.1;
        let a = engine.search(State::new(0.0, 0.0, 0.0), &Square(4.0), &goal);
        let b = engine.search(State::new(0.0, 0.0, 0.0), &Square(4.0), &goal);
        assert!(a.is_found());
        assert_eq!(a.path, b.path);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_open_state_improvement_finds_cheaper_path() {
        // A long direct step is discovered first, a cheap two-step detour
        // reaches the same node later at a lower cost.
        let tol = Tolerances::default();
        let lib = PrimitiveLibrary::new(vec![
            MotionPrimitive::forward(2.0, 5.0),
            MotionPrimitive::forward(1.0, 1.0),
        ])
        .unwrap();
        let goal = |s: &State| (s.x - 2.0).abs() < 0.1;

        let improving = SearchEngine::new(&tol, &lib);
        let result = improving.search(State::new(0.0, 0.0, 0.0), &FreeSpace, &goal);
        assert_relative_eq!(result.cost().unwrap(), 2.0);
        assert_eq!(result.path.len(), 3);
        assert_eq!(result.stats.improved, 1);

        let literal = SearchEngine::new(&tol, &lib).with_open_state_improvement(false);
        let result = literal.search(State::new(0.0, 0.0, 0.0), &FreeSpace, &goal);
        assert_relative_eq!(result.cost().unwrap(), 5.0);
        assert_eq!(result.path.len(), 2);
    }
}
