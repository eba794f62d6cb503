//! Tolerance model for floating-point planning states
//!
//! Every field is quantised into buckets whose width is its tolerance.
//! Identity, hashing and frontier ordering are all derived from the same
//! quantised key, so two states that compare equal always hash equal.
//!
//! Heading is quantised on the circle: the tolerance is rounded to a whole
//! number of bins around 2π and the bin index wraps, so headings just
//! above 0 and just below 2π fall into the same bin.

use std::cmp::Ordering;
use std::f64::consts::TAU;

use serde::Deserialize;

use crate::common::{normalize_angle_positive, PlannerError, PlannerResult};

use super::state::State;

/// Quantised identity of a planning node (cost excluded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey {
    pub x: i64,
    pub y: i64,
    pub heading: i64,
}

/// Frontier priority: cost first, then x, y, heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrontierKey {
    pub cost: i64,
    pub node: StateKey,
}

/// Raw tolerance values as they appear in configuration
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToleranceConfig {
    pub x: f64,
    pub y: f64,
    #[serde(alias = "theta")]
    pub heading: f64,
    #[serde(alias = "distance")]
    pub cost: f64,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            x: 0.00001,
            y: 0.00001,
            heading: 0.01,
            cost: 0.00001,
        }
    }
}

/// Validated comparison tolerances shared by equality, ordering and hashing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    x: f64,
    y: f64,
    heading: f64,
    cost: f64,
    heading_bins: i64,
}

impl Tolerances {
    pub fn new(x: f64, y: f64, heading: f64, cost: f64) -> PlannerResult<Self> {
        for (field, value) in [("x", x), ("y", y), ("heading", heading), ("cost", cost)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlannerError::InvalidTolerance { field, value });
            }
        }
        let heading_bins = ((TAU / heading).round() as i64).max(1);
        Ok(Self { x, y, heading, cost, heading_bins })
    }

    pub fn from_config(config: &ToleranceConfig) -> PlannerResult<Self> {
        Self::new(config.x, config.y, config.heading, config.cost)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Configured heading tolerance
    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Width of one heading bin after fitting the tolerance onto the circle
    pub fn heading_step(&self) -> f64 {
        TAU / self.heading_bins as f64
    }

    pub fn key(&self, state: &State) -> StateKey {
        StateKey {
            x: quantize(state.x, self.x),
            y: quantize(state.y, self.y),
            heading: self.heading_bin(state.heading),
        }
    }

    pub fn frontier_key(&self, state: &State) -> FrontierKey {
        FrontierKey {
            cost: quantize(state.cost, self.cost),
            node: self.key(state),
        }
    }

    /// Whether two states are the same planning node
    pub fn same_node(&self, a: &State, b: &State) -> bool {
        self.key(a) == self.key(b)
    }

    /// Frontier ordering of two states
    pub fn compare(&self, a: &State, b: &State) -> Ordering {
        self.frontier_key(a).cmp(&self.frontier_key(b))
    }

    fn heading_bin(&self, heading: f64) -> i64 {
        let bin = (normalize_angle_positive(heading) / self.heading_step()).round() as i64;
        bin.rem_euclid(self.heading_bins)
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        let c = ToleranceConfig::default();
        Self {
            x: c.x,
            y: c.y,
            heading: c.heading,
            cost: c.cost,
            heading_bins: (TAU / c.heading).round() as i64,
        }
    }
}

fn quantize(value: f64, tolerance: f64) -> i64 {
    (value / tolerance).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(key: &StateKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_rejects_non_positive_tolerances() {
        assert!(matches!(
            Tolerances::new(0.0, 1.0, 1.0, 1.0),
            Err(PlannerError::InvalidTolerance { field: "x", .. })
        ));
        assert!(Tolerances::new(1.0, 1.0, f64::NAN, 1.0).is_err());
        assert!(Tolerances::new(1.0, 1.0, 1.0, -0.1).is_err());
    }

    #[test]
    fn test_default_matches_config_default() {
        let from_config = Tolerances::from_config(&ToleranceConfig::default()).unwrap();
        assert_eq!(from_config, Tolerances::default());
    }

    #[test]
    fn test_cost_is_not_part_of_identity() {
        let tol = Tolerances::default();
        let a = State::new(1.0, 2.0, 0.5);
        let b = a.with_cost(10.0);
        assert!(tol.same_node(&a, &b));
        assert_eq!(tol.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_heading_wraps_at_zero() {
        let tol = Tolerances::default();
        let a = State::new(0.0, 0.0, 0.001);
        let b = State::new(0.0, 0.0, TAU - 0.001);
        assert!(tol.same_node(&a, &b));
        assert_eq!(hash_of(&tol.key(&a)), hash_of(&tol.key(&b)));
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let tol = Tolerances::default();
        let cheap = State::new(5.0, 5.0, 1.0).with_cost(1.0);
        let pricey = State::new(0.0, 0.0, 0.0).with_cost(2.0);
        assert_eq!(tol.compare(&cheap, &pricey), Ordering::Less);

        let left = State::new(0.0, 3.0, 0.0).with_cost(1.0);
        let right = State::new(1.0, 0.0, 0.0).with_cost(1.0 + 1e-7);
        // cost within tolerance, x decides
        assert_eq!(tol.compare(&left, &right), Ordering::Less);
    }

    proptest! {
        #[test]
        fn prop_equal_states_hash_equal(
            x in -50.0f64..50.0,
            y in -50.0f64..50.0,
            heading in 0.0f64..TAU,
            dx in -1e-5f64..1e-5,
            dy in -1e-5f64..1e-5,
            dh in -0.01f64..0.01,
        ) {
            let tol = Tolerances::default();
            let a = State::new(x, y, heading);
            let b = State::new(x + dx, y + dy, heading + dh);
            if tol.same_node(&a, &b) {
                prop_assert_eq!(hash_of(&tol.key(&a)), hash_of(&tol.key(&b)));
                prop_assert!((a.x - b.x).abs() <= tol.x() * (1.0 + 1e-9));
                prop_assert!((a.y - b.y).abs() <= tol.y() * (1.0 + 1e-9));
            }
        }

        #[test]
        fn prop_ordering_consistent_with_identity(
            x in -50.0f64..50.0,
            y in -50.0f64..50.0,
            heading in 0.0f64..TAU,
            cost in 0.0f64..100.0,
        ) {
            let tol = Tolerances::default();
            let a = State::new(x, y, heading).with_cost(cost);
            let b = State::new(x, y, heading).with_cost(cost);
            prop_assert_eq!(tol.compare(&a, &b), Ordering::Equal);
            prop_assert!(tol.same_node(&a, &b));
        }
    }
}
