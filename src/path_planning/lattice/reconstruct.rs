//! Path reconstruction from back-pointers

use std::collections::HashSet;

use log::error;

use super::state::State;
use super::tolerance::Tolerances;

/// Walk back-pointers from `goal` until a state equal to `initial` is
/// reached and return the states ordered start to goal.
///
/// `parent_of` returns the state a given state was expanded from. Returns
/// `None` if the chain breaks or loops before reaching `initial`.
pub fn reconstruct_path<F>(
    goal: State,
    initial: State,
    tolerances: &Tolerances,
    parent_of: F,
) -> Option<Vec<State>>
where
    F: Fn(&State) -> Option<State>,
{
    let mut path = Vec::new();
    let mut seen = HashSet::new();
    let mut current = goal;

    while !tolerances.same_node(&current, &initial) {
        if !seen.insert(tolerances.key(&current)) {
            error!("back-pointer cycle at ({:.3}, {:.3})", current.x, current.y);
            return None;
        }
        path.push(current);
        current = match parent_of(&current) {
            Some(parent) => parent,
            None => {
                error!("missing back-pointer at ({:.3}, {:.3})", current.x, current.y);
                return None;
            }
        };
    }

    path.push(initial);
    path.reverse();
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_planning::lattice::StateKey;
    use std::collections::HashMap;

    fn chain(tol: &Tolerances, states: &[State]) -> HashMap<StateKey, State> {
        states
            .windows(2)
            .map(|w| (tol.key(&w[1]), w[0]))
            .collect()
    }

    #[test]
    fn test_reconstructs_in_start_to_goal_order() {
        let tol = Tolerances::default();
        let states = [
            State::new(0.0, 0.0, 0.0),
            State::new(1.0, 0.0, 0.0).with_cost(1.0),
            State::new(2.0, 0.0, 0.0).with_cost(2.0),
        ];
        let origin = chain(&tol, &states);
        let path = reconstruct_path(states[2], states[0], &tol, |s| origin.get(&tol.key(s)).copied()).unwrap();
        assert_eq!(path, states.to_vec());
    }

    #[test]
    fn test_goal_equal_to_initial_gives_single_state() {
        let tol = Tolerances::default();
        let initial = State::new(1.0, 1.0, 0.0);
        let goal = State::new(1.0 + 1e-7, 1.0, 0.0);
        let path = reconstruct_path(goal, initial, &tol, |_| None).unwrap();
        assert_eq!(path, vec![initial]);
    }

    #[test]
    fn test_broken_chain_is_detected() {
        let tol = Tolerances::default();
        let initial = State::new(0.0, 0.0, 0.0);
        let goal = State::new(3.0, 0.0, 0.0);
        assert!(reconstruct_path(goal, initial, &tol, |_| None).is_none());
    }

    #[test]
    fn test_cycle_is_detected() {
        let tol = Tolerances::default();
        let initial = State::new(0.0, 0.0, 0.0);
        let a = State::new(1.0, 0.0, 0.0);
        let b = State::new(2.0, 0.0, 0.0);
        let parent = |s: &State| if tol.same_node(s, &a) { Some(b) } else { Some(a) };
        assert!(reconstruct_path(b, initial, &tol, parent).is_none());
    }
}
